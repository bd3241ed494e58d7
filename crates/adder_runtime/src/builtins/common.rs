//! Argument validation shared by builtins, constructors and methods.

use crate::core::object::{Kwargs, Value};
use crate::errors::{RunError, RunResult};
use crate::objects::dict::kwarg_names;
use crate::objects::int::as_i64;

fn plural(n: usize) -> &'static str {
    if n == 1 { "argument" } else { "arguments" }
}

/// Validates the positional argument count, worded the way the reference
/// language words it.
pub fn check_arity(name: &str, args: &[Value], min: usize, max: usize) -> RunResult<()> {
    let got = args.len();
    if (min..=max).contains(&got) {
        return Ok(());
    }
    let message = if min == max {
        match min {
            0 => format!("{name}() takes no arguments ({got} given)"),
            1 => format!("{name}() takes exactly one argument ({got} given)"),
            _ => format!("{name} expected {min} {}, got {got}", plural(min)),
        }
    } else if got < min {
        format!("{name} expected at least {min} {}, got {got}", plural(min))
    } else {
        format!("{name} expected at most {max} {}, got {got}", plural(max))
    };
    Err(RunError::type_error(message))
}

pub fn no_kwargs(name: &str, kwargs: Kwargs<'_>) -> RunResult<()> {
    match kwargs {
        Some(k) if k.size() > 0 => Err(RunError::type_error(format!("{name}() takes no keyword arguments"))),
        _ => Ok(()),
    }
}

/// Rejects any keyword argument not listed in `allowed`.
pub fn allowed_kwargs(name: &str, kwargs: Kwargs<'_>, allowed: &[&str]) -> RunResult<()> {
    let Some(k) = kwargs else {
        return Ok(());
    };
    for key in kwarg_names(k)? {
        if !allowed.contains(&key.as_str()) {
            return Err(RunError::type_error(format!(
                "'{key}' is an invalid keyword argument for {name}()"
            )));
        }
    }
    Ok(())
}

pub fn kwarg(kwargs: Kwargs<'_>, key: &str) -> Option<Value> {
    kwargs.and_then(|k| k.get_str(key))
}

/// Positional argument `pos`, falling back to keyword `key`.
pub fn arg_or_kwarg(args: &[Value], pos: usize, kwargs: Kwargs<'_>, key: &str) -> Option<Value> {
    args.get(pos).cloned().or_else(|| kwarg(kwargs, key))
}

/// An integer argument (`int` or `bool`).
pub fn int_arg(v: &Value) -> RunResult<i64> {
    as_i64(v).ok_or_else(|| {
        RunError::type_error(format!("'{}' object cannot be interpreted as an integer", v.type_name()))
    })
}

/// A `str` argument, named in the error as `name() argument N`.
pub fn str_arg(name: &str, pos: usize, v: &Value) -> RunResult<String> {
    match v.as_str() {
        Some(s) => Ok(s.to_string()),
        None => Err(RunError::type_error(format!(
            "{name}() argument {} must be str, not {}",
            pos + 1,
            v.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::dict::Dict;

    #[test]
    fn arity_messages() {
        let one = [Value::int(1)];
        let err = check_arity("len", &[], 1, 1).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: len() takes exactly one argument (0 given)");
        let err = check_arity("range", &[], 1, 3).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: range expected at least 1 argument, got 0");
        let err = check_arity("getattr", &one, 2, 3).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: getattr expected at least 2 arguments, got 1");
        let err = check_arity("list", &[Value::int(1), Value::int(2)], 0, 1).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: list expected at most 1 argument, got 2");
        assert!(check_arity("x", &one, 0, 2).is_ok());
    }

    #[test]
    fn keyword_validation() {
        let kw = Dict::new();
        kw.insert(Value::new_str("start"), Value::int(1)).unwrap();
        assert!(no_kwargs("len", None).is_ok());
        let err = no_kwargs("len", Some(&kw)).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: len() takes no keyword arguments");
        assert!(allowed_kwargs("enumerate", Some(&kw), &["start"]).is_ok());
        let err = allowed_kwargs("sorted", Some(&kw), &["key", "reverse"]).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: 'start' is an invalid keyword argument for sorted()");
        assert_eq!(kwarg(Some(&kw), "start").unwrap().repr().unwrap(), "1");
    }
}
