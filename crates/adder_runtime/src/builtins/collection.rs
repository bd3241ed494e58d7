use crate::Runtime;
use crate::core::object::{Kwargs, Value};
use crate::errors::{RunError, RunResult};
use crate::methods::common::{sort_options, sort_with_key};
use crate::objects::list::List;

use super::common::{check_arity, no_kwargs};

pub fn builtin_all(_rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    no_kwargs("all", kwargs)?;
    check_arity("all", args, 1, 1)?;
    for item in args[0].iterate()? {
        if !item?.bool_value()? {
            return Ok(Value::bool(false));
        }
    }
    Ok(Value::bool(true))
}

pub fn builtin_any(_rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    no_kwargs("any", kwargs)?;
    check_arity("any", args, 1, 1)?;
    for item in args[0].iterate()? {
        if item?.bool_value()? {
            return Ok(Value::bool(true));
        }
    }
    Ok(Value::bool(false))
}

/// `sorted(iterable, *, key=None, reverse=False)`
pub fn builtin_sorted(rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    let (key, reverse) = sort_options("sorted", kwargs)?;
    if args.len() != 1 {
        return Err(RunError::type_error(format!(
            "sorted expected 1 argument, got {}",
            args.len()
        )));
    }
    let mut items = args[0].to_vec()?;
    sort_with_key(rt, &mut items, key.as_ref(), reverse)?;
    Ok(List::value(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exceptions::TYPE_ERROR_TYPE;
    use crate::objects::dict::Dict;
    use crate::objects::tuple::Tuple;

    #[test]
    fn all_and_any_short_circuit() {
        let mut rt = Runtime::new();
        let items = Tuple::value(vec![Value::int(0), Value::new_str("x")]);
        assert_eq!(builtin_all(&mut rt, &[items.clone()], None).unwrap().repr().unwrap(), "False");
        assert_eq!(builtin_any(&mut rt, &[items], None).unwrap().repr().unwrap(), "True");
        let empty = Tuple::value(Vec::new());
        assert_eq!(builtin_all(&mut rt, &[empty.clone()], None).unwrap().repr().unwrap(), "True");
        assert_eq!(builtin_any(&mut rt, &[empty], None).unwrap().repr().unwrap(), "False");
    }

    #[test]
    fn sorted_is_stable_and_leaves_the_input_alone() {
        let mut rt = Runtime::new();
        let src = Tuple::value(vec![Value::new_str("b"), Value::new_str("a"), Value::new_str("c")]);
        let out = builtin_sorted(&mut rt, &[src.clone()], None).unwrap();
        assert_eq!(out.repr().unwrap(), "['a', 'b', 'c']");
        assert_eq!(src.repr().unwrap(), "('b', 'a', 'c')");
        let kw = Dict::new();
        kw.insert(Value::new_str("reverse"), Value::bool(true)).unwrap();
        let out = builtin_sorted(&mut rt, &[Value::new_str("bca")], Some(&kw)).unwrap();
        assert_eq!(out.repr().unwrap(), "['c', 'b', 'a']");
        let mixed = Tuple::value(vec![Value::int(1), Value::new_str("a")]);
        assert!(builtin_sorted(&mut rt, &[mixed], None).unwrap_err().matches(&TYPE_ERROR_TYPE));
    }
}
