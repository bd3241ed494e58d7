use adder_core::Text;
use smallvec::SmallVec;

use crate::builtins::common::{allowed_kwargs, arg_or_kwarg, check_arity, int_arg, str_arg};
use crate::core::object::{Kwargs, Value};
use crate::errors::messages::EMPTY_SEPARATOR;
use crate::errors::{RunError, RunResult};
use crate::objects::list::List;
use crate::objects::str::{STR_TYPE, Str};
use crate::objects::tuple::Tuple;

use super::MethodKind;
use super::common::{arity, opt_int};

pub(crate) fn supports(kind: MethodKind) -> bool {
    matches!(
        kind,
        MethodKind::Join
            | MethodKind::Lower
            | MethodKind::Upper
            | MethodKind::Split
            | MethodKind::Strip
            | MethodKind::StartsWith
            | MethodKind::EndsWith
            | MethodKind::Replace
            | MethodKind::Find
            | MethodKind::Count
    )
}

pub(super) fn dispatch(s: &Str, kind: MethodKind, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    let text = s.as_str();
    match kind {
        MethodKind::Join => {
            arity(kind, args, kwargs, 1, 1)?;
            join(text, &args[0])
        }
        MethodKind::Lower => {
            arity(kind, args, kwargs, 0, 0)?;
            Ok(Value::new_string(text.to_lowercase()))
        }
        MethodKind::Upper => {
            arity(kind, args, kwargs, 0, 0)?;
            Ok(Value::new_string(text.to_uppercase()))
        }
        MethodKind::Split => {
            allowed_kwargs("split", kwargs, &["sep", "maxsplit"])?;
            check_arity("split", args, 0, 2)?;
            let sep = arg_or_kwarg(args, 0, kwargs, "sep").filter(|v| !v.is_none());
            let maxsplit = match arg_or_kwarg(args, 1, kwargs, "maxsplit") {
                Some(v) => int_arg(&v)?,
                None => -1,
            };
            split(text, sep.as_ref(), maxsplit)
        }
        MethodKind::Strip => {
            arity(kind, args, kwargs, 0, 1)?;
            match args.first().filter(|v| !v.is_none()) {
                None => Ok(Value::new_str(text.trim())),
                Some(chars) => {
                    let Some(chars) = chars.as_str() else {
                        return Err(RunError::type_error("strip arg must be None or str"));
                    };
                    let set: SmallVec<[char; 8]> = chars.chars().collect();
                    Ok(Value::new_str(text.trim_matches(|c: char| set.contains(&c))))
                }
            }
        }
        MethodKind::StartsWith | MethodKind::EndsWith => {
            arity(kind, args, kwargs, 1, 3)?;
            if args.len() > 1 {
                return Err(RunError::unsupported("startswith/endswith with bounds", STR_TYPE.name));
            }
            affix(text, kind, &args[0])
        }
        MethodKind::Replace => {
            arity(kind, args, kwargs, 2, 3)?;
            let old = str_arg("replace", 0, &args[0])?;
            let new = str_arg("replace", 1, &args[1])?;
            let out = match opt_int(args, 2)? {
                Some(n) if n >= 0 => text.replacen(old.as_str(), &new, n as usize),
                _ => text.replace(old.as_str(), &new),
            };
            Ok(Value::new_string(out))
        }
        MethodKind::Find => {
            arity(kind, args, kwargs, 1, 3)?;
            let sub = needle(&args[0])?;
            let Some((lo, hi, first_char)) = window(s.text(), args)? else {
                return Ok(Value::int(-1));
            };
            let found = text[lo..hi].find(sub).map(|b| first_char + text[lo..lo + b].chars().count() as i64);
            Ok(Value::int(found.unwrap_or(-1)))
        }
        MethodKind::Count => {
            arity(kind, args, kwargs, 1, 3)?;
            let sub = needle(&args[0])?;
            let Some((lo, hi, _)) = window(s.text(), args)? else {
                return Ok(Value::int(0));
            };
            Ok(Value::int(text[lo..hi].matches(sub).count() as i64))
        }
        _ => Err(RunError::unsupported(kind.name(), STR_TYPE.name)),
    }
}

fn needle(v: &Value) -> RunResult<&str> {
    v.as_str()
        .ok_or_else(|| RunError::type_error(format!("must be str, not {}", v.type_name())))
}

/// Byte range for the optional `start`/`end` arguments at positions 1 and 2,
/// plus the code point index of the range start. `None` when `start` lies
/// past the end of the string.
fn window(text: &Text, args: &[Value]) -> RunResult<Option<(usize, usize, i64)>> {
    let len = text.char_count() as i64;
    let clamp = |i: i64| if i < 0 { (i + len).max(0) } else { i.min(len) };
    let raw_start = opt_int(args, 1)?.unwrap_or(0);
    let start = clamp(raw_start);
    let end = clamp(opt_int(args, 2)?.unwrap_or(len));
    if raw_start > len {
        return Ok(None);
    }
    let byte_at = |ci: i64| text.byte_offset(ci as usize).unwrap_or(text.len());
    let lo = byte_at(start);
    let hi = byte_at(end.max(start));
    Ok(Some((lo, hi, start)))
}

fn join(sep: &str, iterable: &Value) -> RunResult<Value> {
    let mut out = String::new();
    for (i, item) in iterable.iterate()?.enumerate() {
        let item = item?;
        let Some(part) = item.as_str() else {
            return Err(RunError::type_error(format!(
                "sequence item {i}: expected str instance, {} found",
                item.type_name()
            )));
        };
        if i > 0 {
            out.push_str(sep);
        }
        out.push_str(part);
    }
    Ok(Value::new_string(out))
}

fn split(text: &str, sep: Option<&Value>, maxsplit: i64) -> RunResult<Value> {
    let limit = if maxsplit < 0 { usize::MAX } else { maxsplit as usize };
    let Some(sep) = sep else {
        return Ok(List::value(split_whitespace(text, limit)));
    };
    let Some(sep) = sep.as_str() else {
        return Err(RunError::type_error(format!("must be str or None, not {}", sep.type_name())));
    };
    let mut chars = sep.chars();
    let delim = match (chars.next(), chars.next()) {
        (None, _) => return Err(RunError::value_error(EMPTY_SEPARATOR)),
        (Some(c), None) => c,
        _ => return Err(RunError::unsupported("split with a multi-character separator", STR_TYPE.name)),
    };
    let parts = text
        .splitn(limit.saturating_add(1), delim)
        .map(Value::new_str)
        .collect();
    Ok(List::value(parts))
}

fn split_whitespace(text: &str, limit: usize) -> Vec<Value> {
    let mut parts = Vec::new();
    let mut rest = text.trim_start();
    while !rest.is_empty() {
        if parts.len() == limit {
            parts.push(Value::new_str(rest));
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(end) => {
                parts.push(Value::new_str(&rest[..end]));
                rest = rest[end..].trim_start();
            }
            None => {
                parts.push(Value::new_str(rest));
                break;
            }
        }
    }
    parts
}

fn affix(text: &str, kind: MethodKind, pattern: &Value) -> RunResult<Value> {
    let test = |p: &str| if kind == MethodKind::StartsWith { text.starts_with(p) } else { text.ends_with(p) };
    if let Some(p) = pattern.as_str() {
        return Ok(Value::bool(test(p)));
    }
    let bad = |v: &Value| {
        RunError::type_error(format!(
            "{} first arg must be str or a tuple of str, not {}",
            kind.name(),
            v.type_name()
        ))
    };
    let Some(options) = pattern.downcast_ref::<Tuple>() else {
        return Err(bad(pattern));
    };
    for option in options.items() {
        let Some(p) = option.as_str() else {
            return Err(RunError::type_error(format!(
                "tuple for {} must only contain str, not {}",
                kind.name(),
                option.type_name()
            )));
        };
        if test(p) {
            return Ok(Value::bool(true));
        }
    }
    Ok(Value::bool(false))
}
