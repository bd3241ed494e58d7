use crate::Runtime;
use crate::core::object::{Kwargs, Value};
use crate::errors::{RunError, RunResult};
use crate::objects::bytes::bytes_like;
use crate::objects::str::Str;

use super::common::{allowed_kwargs, arg_or_kwarg, check_arity, int_arg, kwarg, no_kwargs};

pub fn builtin_abs(_rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    no_kwargs("abs", kwargs)?;
    check_arity("abs", args, 1, 1)?;
    args[0].abs()
}

pub fn builtin_hex(_rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    no_kwargs("hex", kwargs)?;
    check_arity("hex", args, 1, 1)?;
    let n = int_arg(&args[0])?;
    let digits = format!("{:x}", n.unsigned_abs());
    Ok(Value::new_string(if n < 0 { format!("-0x{digits}") } else { format!("0x{digits}") }))
}

pub fn builtin_chr(_rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    no_kwargs("chr", kwargs)?;
    check_arity("chr", args, 1, 1)?;
    let code = int_arg(&args[0])?;
    if !(0..=0x10FFFF).contains(&code) {
        return Err(RunError::value_error("chr() arg not in range(0x110000)"));
    }
    // Surrogates have no `char`; they are the one gap in the code point range.
    match char::from_u32(code as u32) {
        Some(c) => Ok(Value::new_string(c.to_string())),
        None => Err(RunError::unsupported("chr() of a surrogate code point", "int")),
    }
}

pub fn builtin_ord(_rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    no_kwargs("ord", kwargs)?;
    check_arity("ord", args, 1, 1)?;
    let obj = &args[0];
    if let Some(s) = obj.downcast_ref::<Str>() {
        let mut chars = s.as_str().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Value::int(c as i64)),
            _ => Err(RunError::type_error(format!(
                "ord() expected a character, but string of length {} found",
                s.char_len()
            ))),
        };
    }
    if let Some(raw) = bytes_like(obj) {
        return match raw.as_slice() {
            [b] => Ok(Value::int(*b as i64)),
            _ => Err(RunError::type_error(format!(
                "ord() expected a character, but string of length {} found",
                raw.len()
            ))),
        };
    }
    Err(RunError::type_error(format!(
        "ord() expected string of length 1, but {} found",
        obj.type_name()
    )))
}

pub fn builtin_sum(_rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    allowed_kwargs("sum", kwargs, &["start"])?;
    check_arity("sum", args, 1, 2)?;
    let mut total = arg_or_kwarg(args, 1, kwargs, "start").unwrap_or_else(|| Value::int(0));
    if total.as_str().is_some() {
        return Err(RunError::type_error("sum() can't sum strings [use ''.join(seq) instead]"));
    }
    if bytes_like(&total).is_some() {
        return Err(RunError::type_error("sum() can't sum bytes [use b''.join(seq) instead]"));
    }
    for item in args[0].iterate()? {
        total = total.add(&item?)?;
    }
    Ok(total)
}

#[derive(Clone, Copy)]
enum Extreme {
    Max,
    Min,
}

impl Extreme {
    fn name(self) -> &'static str {
        match self {
            Extreme::Max => "max",
            Extreme::Min => "min",
        }
    }

    /// True when `candidate` should replace `best`; ties keep the first seen.
    fn beats(self, candidate: &Value, best: &Value) -> RunResult<bool> {
        match self {
            Extreme::Max => candidate.gt(best),
            Extreme::Min => candidate.lt(best),
        }
    }
}

fn extreme(rt: &mut Runtime, which: Extreme, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    let name = which.name();
    allowed_kwargs(name, kwargs, &["key", "default"])?;
    if args.is_empty() {
        return Err(RunError::type_error(format!("{name} expected at least 1 argument, got 0")));
    }
    let key = kwarg(kwargs, "key").filter(|k| !k.is_none());
    let default = kwarg(kwargs, "default");
    let items = if args.len() == 1 {
        args[0].to_vec()?
    } else {
        if default.is_some() {
            return Err(RunError::type_error(format!(
                "Cannot specify a default for {name}() with multiple positional arguments"
            )));
        }
        args.to_vec()
    };
    let mut best: Option<(Value, Value)> = None;
    for item in items {
        let score = match &key {
            Some(f) => f.call(rt, std::slice::from_ref(&item), None)?,
            None => item.clone(),
        };
        let replace = match &best {
            None => true,
            Some((best_score, _)) => which.beats(&score, best_score)?,
        };
        if replace {
            best = Some((score, item));
        }
    }
    match (best, default) {
        (Some((_, item)), _) => Ok(item),
        (None, Some(default)) => Ok(default),
        (None, None) => Err(RunError::value_error(format!("{name}() arg is an empty sequence"))),
    }
}

pub fn builtin_max(rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    extreme(rt, Extreme::Max, args, kwargs)
}

pub fn builtin_min(rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    extreme(rt, Extreme::Min, args, kwargs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::BuiltinFunction;
    use crate::core::exceptions::{OVERFLOW_ERROR_TYPE, TYPE_ERROR_TYPE, VALUE_ERROR_TYPE};
    use crate::objects::dict::Dict;
    use crate::objects::list::List;

    fn ints(values: &[i64]) -> Value {
        List::value(values.iter().copied().map(Value::int).collect())
    }

    #[test]
    fn abs_traps_overflow() {
        let mut rt = Runtime::new();
        assert_eq!(builtin_abs(&mut rt, &[Value::int(-3)], None).unwrap().repr().unwrap(), "3");
        let err = builtin_abs(&mut rt, &[Value::int(i64::MIN)], None).unwrap_err();
        assert!(err.matches(&OVERFLOW_ERROR_TYPE));
    }

    #[test]
    fn hex_of_negatives() {
        let mut rt = Runtime::new();
        assert_eq!(builtin_hex(&mut rt, &[Value::int(255)], None).unwrap().str().unwrap(), "0xff");
        assert_eq!(builtin_hex(&mut rt, &[Value::int(-16)], None).unwrap().str().unwrap(), "-0x10");
        assert_eq!(
            builtin_hex(&mut rt, &[Value::int(i64::MIN)], None).unwrap().str().unwrap(),
            "-0x8000000000000000"
        );
    }

    #[test]
    fn chr_and_ord() {
        let mut rt = Runtime::new();
        assert_eq!(builtin_chr(&mut rt, &[Value::int(233)], None).unwrap().str().unwrap(), "é");
        let err = builtin_chr(&mut rt, &[Value::int(0x110000)], None).unwrap_err();
        assert!(err.matches(&VALUE_ERROR_TYPE));
        assert_eq!(builtin_ord(&mut rt, &[Value::new_str("é")], None).unwrap().repr().unwrap(), "233");
        let err = builtin_ord(&mut rt, &[Value::new_str("ab")], None).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: ord() expected a character, but string of length 2 found");
        assert!(builtin_ord(&mut rt, &[Value::int(1)], None).unwrap_err().matches(&TYPE_ERROR_TYPE));
    }

    #[test]
    fn sum_with_start() {
        let mut rt = Runtime::new();
        assert_eq!(builtin_sum(&mut rt, &[ints(&[1, 2, 3])], None).unwrap().repr().unwrap(), "6");
        let start = ints(&[0]);
        let nested = List::value(vec![ints(&[1]), ints(&[2])]);
        assert_eq!(builtin_sum(&mut rt, &[nested, start], None).unwrap().repr().unwrap(), "[0, 1, 2]");
        let err = builtin_sum(&mut rt, &[ints(&[i64::MAX, 1])], None).unwrap_err();
        assert!(err.matches(&OVERFLOW_ERROR_TYPE));
        let err = builtin_sum(&mut rt, &[ints(&[]), Value::new_str("")], None).unwrap_err();
        assert!(err.matches(&TYPE_ERROR_TYPE));
    }

    #[test]
    fn max_and_min() {
        let mut rt = Runtime::new();
        assert_eq!(builtin_max(&mut rt, &[ints(&[3, 9, 2])], None).unwrap().repr().unwrap(), "9");
        assert_eq!(builtin_min(&mut rt, &[Value::int(4), Value::int(-1)], None).unwrap().repr().unwrap(), "-1");
        let err = builtin_max(&mut rt, &[ints(&[])], None).unwrap_err();
        assert_eq!(err.to_string(), "ValueError: max() arg is an empty sequence");
        let kw = Dict::new();
        kw.insert(Value::new_str("default"), Value::none()).unwrap();
        assert!(builtin_min(&mut rt, &[ints(&[])], Some(&kw)).unwrap().is_none());
        let kw = Dict::new();
        kw.insert(Value::new_str("key"), BuiltinFunction::value("abs", builtin_abs)).unwrap();
        assert_eq!(builtin_max(&mut rt, &[ints(&[3, -7, 5])], Some(&kw)).unwrap().repr().unwrap(), "-7");
    }
}
