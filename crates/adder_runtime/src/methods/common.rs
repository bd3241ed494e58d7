use std::cmp::Ordering;

use crate::Runtime;
use crate::builtins::common::{allowed_kwargs, check_arity, int_arg, kwarg, no_kwargs};
use crate::core::object::{Kwargs, Value};
use crate::errors::RunResult;
use crate::objects::list::sort_values;

use super::MethodKind;

/// Positional arity for a method that accepts no keywords.
pub(super) fn arity(kind: MethodKind, args: &[Value], kwargs: Kwargs<'_>, min: usize, max: usize) -> RunResult<()> {
    no_kwargs(kind.name(), kwargs)?;
    check_arity(kind.name(), args, min, max)
}

/// Optional integer argument at `pos`; `None` counts as absent.
pub(super) fn opt_int(args: &[Value], pos: usize) -> RunResult<Option<i64>> {
    match args.get(pos) {
        None => Ok(None),
        Some(v) if v.is_none() => Ok(None),
        Some(v) => int_arg(v).map(Some),
    }
}

/// Parses the keyword-only `key=` and `reverse=` arguments of `sort`/`sorted`.
pub(crate) fn sort_options(name: &str, kwargs: Kwargs<'_>) -> RunResult<(Option<Value>, bool)> {
    allowed_kwargs(name, kwargs, &["key", "reverse"])?;
    let key = kwarg(kwargs, "key").filter(|k| !k.is_none());
    let reverse = match kwarg(kwargs, "reverse") {
        Some(r) => r.bool_value()?,
        None => false,
    };
    Ok((key, reverse))
}

/// Stable sort with an optional key function applied once per item.
pub(crate) fn sort_with_key(rt: &mut Runtime, items: &mut Vec<Value>, key: Option<&Value>, reverse: bool) -> RunResult<()> {
    let Some(key) = key else {
        return sort_values(items, reverse);
    };
    let mut keyed = Vec::with_capacity(items.len());
    for item in items.drain(..) {
        let k = key.call(rt, std::slice::from_ref(&item), None)?;
        keyed.push((k, item));
    }
    let mut first_err = None;
    keyed.sort_by(|(a, _), (b, _)| {
        if first_err.is_some() {
            return Ordering::Equal;
        }
        let ord = match a.lt(b) {
            Ok(true) => Ok(Ordering::Less),
            Ok(false) => b.lt(a).map(|gt| if gt { Ordering::Greater } else { Ordering::Equal }),
            Err(e) => Err(e),
        };
        match ord {
            Ok(ord) if reverse => ord.reverse(),
            Ok(ord) => ord,
            Err(e) => {
                first_err = Some(e);
                Ordering::Equal
            }
        }
    });
    items.extend(keyed.into_iter().map(|(_, item)| item));
    first_err.map_or(Ok(()), Err)
}
