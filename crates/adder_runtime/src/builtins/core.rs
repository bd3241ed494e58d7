use crate::Runtime;
use crate::core::exceptions::ATTRIBUTE_ERROR_TYPE;
use crate::core::object::{Kwargs, Value};
use crate::core::types::{isinstance, issubclass};
use crate::errors::{RunError, RunResult};
use crate::objects::file;

use super::common::{allowed_kwargs, arg_or_kwarg, check_arity, kwarg, no_kwargs};

/// Renders an optional `sep`/`end` keyword, which must be `str` or `None`.
fn separator(kwargs: Kwargs<'_>, key: &str, default: &str) -> RunResult<String> {
    match kwarg(kwargs, key) {
        None => Ok(default.to_string()),
        Some(v) if v.is_none() => Ok(default.to_string()),
        Some(v) => match v.as_str() {
            Some(s) => Ok(s.to_string()),
            None => Err(RunError::type_error(format!("{key} must be None or a string, not {}", v.type_name()))),
        },
    }
}

pub fn builtin_print(rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    allowed_kwargs("print", kwargs, &["sep", "end", "file", "flush"])?;
    if kwarg(kwargs, "file").is_some_and(|f| !f.is_none()) {
        return Err(RunError::unsupported("print to a file", "builtin_function_or_method"));
    }
    let sep = separator(kwargs, "sep", " ")?;
    let end = separator(kwargs, "end", "\n")?;
    let mut line = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            line.push_str(&sep);
        }
        line.push_str(&arg.str()?);
    }
    line.push_str(&end);
    rt.write_output(&line);
    Ok(Value::none())
}

pub fn builtin_repr(_rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    no_kwargs("repr", kwargs)?;
    check_arity("repr", args, 1, 1)?;
    Ok(Value::new_string(args[0].repr()?))
}

pub fn builtin_hash(_rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    no_kwargs("hash", kwargs)?;
    check_arity("hash", args, 1, 1)?;
    Ok(Value::int(args[0].hash_code()?))
}

pub fn builtin_len(_rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    no_kwargs("len", kwargs)?;
    check_arity("len", args, 1, 1)?;
    let obj = &args[0];
    if !obj.has_len() {
        return Err(RunError::type_error(format!("object of type '{}' has no len()", obj.type_name())));
    }
    Ok(Value::int(obj.len()?))
}

pub fn builtin_iter(_rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    no_kwargs("iter", kwargs)?;
    check_arity("iter", args, 1, 1)?;
    args[0].iter()
}

pub fn builtin_next(_rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    no_kwargs("next", kwargs)?;
    check_arity("next", args, 1, 2)?;
    let it = &args[0];
    // Iterators are exactly the iterables whose `iter()` is themselves.
    if !it.has_iter() || !it.iter()?.is(it) {
        return Err(RunError::type_error(format!("'{}' object is not an iterator", it.type_name())));
    }
    match (it.next()?, args.get(1)) {
        (Some(v), _) => Ok(v),
        (None, Some(default)) => Ok(default.clone()),
        (None, None) => Err(RunError::stop_iteration()),
    }
}

pub fn builtin_getattr(_rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    no_kwargs("getattr", kwargs)?;
    check_arity("getattr", args, 2, 3)?;
    let Some(name) = args[1].as_str() else {
        return Err(RunError::type_error(format!(
            "attribute name must be string, not '{}'",
            args[1].type_name()
        )));
    };
    match (args[0].get_attr(name), args.get(2)) {
        (Err(e), Some(default)) if e.matches(&ATTRIBUTE_ERROR_TYPE) => Ok(default.clone()),
        (result, _) => result,
    }
}

pub fn builtin_isinstance(_rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    no_kwargs("isinstance", kwargs)?;
    check_arity("isinstance", args, 2, 2)?;
    Ok(Value::bool(isinstance(&args[0], &args[1])?))
}

pub fn builtin_issubclass(_rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    no_kwargs("issubclass", kwargs)?;
    check_arity("issubclass", args, 2, 2)?;
    Ok(Value::bool(issubclass(&args[0], &args[1])?))
}

pub fn builtin_open(rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    allowed_kwargs("open", kwargs, &["file", "mode", "encoding"])?;
    check_arity("open", args, 0, 3)?;
    let Some(path) = arg_or_kwarg(args, 0, kwargs, "file") else {
        return Err(RunError::type_error("open() missing required argument 'file' (pos 1)"));
    };
    let Some(path) = path.as_str() else {
        return Err(RunError::type_error(format!(
            "expected str, bytes or os.PathLike object, not {}",
            path.type_name()
        )));
    };
    let mode = match arg_or_kwarg(args, 1, kwargs, "mode") {
        Some(m) => match m.as_str() {
            Some(m) => m.to_string(),
            None => return Err(RunError::type_error(format!("open() argument 'mode' must be str, not {}", m.type_name()))),
        },
        None => "r".to_string(),
    };
    if let Some(encoding) = arg_or_kwarg(args, 2, kwargs, "encoding").filter(|e| !e.is_none()) {
        let utf8 = encoding
            .as_str()
            .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "utf-8" | "utf8"));
        if !utf8 {
            return Err(RunError::unsupported("open with a non-UTF-8 encoding", "file"));
        }
    }
    file::open(rt, path, &mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuntimeConfig;
    use crate::core::exceptions::{STOP_ITERATION_TYPE, TYPE_ERROR_TYPE};
    use crate::objects::dict::Dict;
    use crate::objects::int::INT_TYPE;
    use crate::objects::list::List;

    fn capturing() -> Runtime {
        Runtime::with_config(RuntimeConfig { capture_output: true, ..RuntimeConfig::default() })
    }

    #[test]
    fn print_joins_with_sep_and_end() {
        let mut rt = capturing();
        builtin_print(&mut rt, &[Value::int(1), Value::new_str("a"), Value::bool(true)], None).unwrap();
        let kw = Dict::new();
        kw.insert(Value::new_str("sep"), Value::new_str("-")).unwrap();
        kw.insert(Value::new_str("end"), Value::new_str("")).unwrap();
        builtin_print(&mut rt, &[Value::int(1), Value::int(2)], Some(&kw)).unwrap();
        assert_eq!(rt.take_output(), "1 a True\n1-2");
    }

    #[test]
    fn len_requires_a_sized_object() {
        let mut rt = Runtime::new();
        let n = builtin_len(&mut rt, &[Value::new_str("héllo")], None).unwrap();
        assert_eq!(n.repr().unwrap(), "5");
        let err = builtin_len(&mut rt, &[Value::int(3)], None).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: object of type 'int' has no len()");
        let err = builtin_len(&mut rt, &[], None).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: len() takes exactly one argument (0 given)");
    }

    #[test]
    fn next_with_and_without_default() {
        let mut rt = Runtime::new();
        let it = builtin_iter(&mut rt, &[List::value(vec![Value::int(7)])], None).unwrap();
        assert_eq!(builtin_next(&mut rt, &[it.clone()], None).unwrap().repr().unwrap(), "7");
        assert!(builtin_next(&mut rt, &[it.clone(), Value::none()], None).unwrap().is_none());
        let err = builtin_next(&mut rt, &[it], None).unwrap_err();
        assert!(err.matches(&STOP_ITERATION_TYPE));
        let err = builtin_next(&mut rt, &[List::value(Vec::new())], None).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: 'list' object is not an iterator");
        let err = builtin_iter(&mut rt, &[Value::int(1)], None).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: 'int' object is not iterable");
    }

    #[test]
    fn getattr_falls_back_on_attribute_error_only() {
        let mut rt = Runtime::new();
        let args = [Value::int(1), Value::new_str("missing"), Value::int(0)];
        assert_eq!(builtin_getattr(&mut rt, &args, None).unwrap().repr().unwrap(), "0");
        let cls = builtin_getattr(&mut rt, &[Value::int(1), Value::new_str("__class__")], None).unwrap();
        assert!(cls.is(&INT_TYPE.value()));
        let err = builtin_getattr(&mut rt, &[Value::int(1), Value::int(2)], None).unwrap_err();
        assert!(err.matches(&TYPE_ERROR_TYPE));
    }

    #[test]
    fn repr_and_hash() {
        let mut rt = Runtime::new();
        let r = builtin_repr(&mut rt, &[Value::new_str("it's")], None).unwrap();
        assert_eq!(r.str().unwrap(), "\"it's\"");
        assert_eq!(builtin_hash(&mut rt, &[Value::int(5)], None).unwrap().repr().unwrap(), "5");
        let err = builtin_hash(&mut rt, &[List::value(Vec::new())], None).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: unhashable type: 'list'");
    }
}
