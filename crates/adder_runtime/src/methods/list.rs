use std::rc::Rc;

use crate::Runtime;
use crate::core::object::{Kwargs, Value};
use crate::errors::{RunError, RunResult};
use crate::objects::list::{LIST_TYPE, List};
use crate::objects::sequence::seq_count;

use super::MethodKind;
use super::common::{arity, opt_int, sort_options, sort_with_key};
use super::tuple::index_of;

pub(crate) fn supports(kind: MethodKind) -> bool {
    matches!(
        kind,
        MethodKind::Append
            | MethodKind::Extend
            | MethodKind::Clear
            | MethodKind::Count
            | MethodKind::Index
            | MethodKind::Pop
            | MethodKind::Insert
            | MethodKind::Remove
            | MethodKind::Reverse
            | MethodKind::Sort
            | MethodKind::Copy
    )
}

pub(super) fn dispatch(rt: &mut Runtime, l: &Rc<List>, kind: MethodKind, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    match kind {
        MethodKind::Append => {
            arity(kind, args, kwargs, 1, 1)?;
            l.push(args[0].clone());
            Ok(Value::none())
        }
        MethodKind::Extend => {
            arity(kind, args, kwargs, 1, 1)?;
            l.extend_from(&args[0])?;
            Ok(Value::none())
        }
        MethodKind::Clear => {
            arity(kind, args, kwargs, 0, 0)?;
            l.clear();
            Ok(Value::none())
        }
        MethodKind::Count => {
            arity(kind, args, kwargs, 1, 1)?;
            Ok(Value::int(seq_count(&l.snapshot(), &args[0])?))
        }
        MethodKind::Index => {
            arity(kind, args, kwargs, 1, 3)?;
            index_of(&l.snapshot(), args, "list")
        }
        MethodKind::Pop => {
            arity(kind, args, kwargs, 0, 1)?;
            l.pop(opt_int(args, 0)?.unwrap_or(-1))
        }
        MethodKind::Insert => {
            arity(kind, args, kwargs, 2, 2)?;
            let Some(index) = opt_int(args, 0)? else {
                return Err(RunError::type_error("'NoneType' object cannot be interpreted as an integer"));
            };
            l.insert(index, args[1].clone());
            Ok(Value::none())
        }
        MethodKind::Remove => {
            arity(kind, args, kwargs, 1, 1)?;
            l.remove(&args[0])?;
            Ok(Value::none())
        }
        MethodKind::Reverse => {
            arity(kind, args, kwargs, 0, 0)?;
            l.reverse();
            Ok(Value::none())
        }
        MethodKind::Sort => {
            let (key, reverse) = sort_options("sort", kwargs)?;
            if !args.is_empty() {
                return Err(RunError::type_error("sort() takes no positional arguments"));
            }
            if key.is_none() {
                l.sort(reverse)?;
                return Ok(Value::none());
            }
            let mut items = l.snapshot();
            sort_with_key(rt, &mut items, key.as_ref(), reverse)?;
            l.clear();
            for item in items {
                l.push(item);
            }
            Ok(Value::none())
        }
        MethodKind::Copy => {
            arity(kind, args, kwargs, 0, 0)?;
            Ok(List::value(l.snapshot()))
        }
        _ => Err(RunError::unsupported(kind.name(), LIST_TYPE.name)),
    }
}

#[cfg(test)]
mod tests {
    use crate::Runtime;
    use crate::builtins::BuiltinFunction;
    use crate::core::exceptions::{INDEX_ERROR_TYPE, TYPE_ERROR_TYPE, VALUE_ERROR_TYPE};
    use crate::core::object::Value;
    use crate::objects::dict::Dict;
    use crate::objects::list::List;

    fn call(rt: &mut Runtime, recv: &Value, name: &str, args: &[Value]) -> crate::errors::RunResult<Value> {
        recv.get_attr(name)?.call(rt, args, None)
    }

    fn ints(values: &[i64]) -> Value {
        List::value(values.iter().copied().map(Value::int).collect())
    }

    #[test]
    fn mutators_return_none() {
        let mut rt = Runtime::new();
        let l = ints(&[3, 1]);
        assert!(call(&mut rt, &l, "append", &[Value::int(2)]).unwrap().is_none());
        call(&mut rt, &l, "insert", &[Value::int(0), Value::int(9)]).unwrap();
        call(&mut rt, &l, "extend", &[Value::new_str("ab")]).unwrap();
        assert_eq!(l.repr().unwrap(), "[9, 3, 1, 2, 'a', 'b']");
        assert_eq!(call(&mut rt, &l, "pop", &[]).unwrap().repr().unwrap(), "'b'");
        assert_eq!(call(&mut rt, &l, "pop", &[Value::int(0)]).unwrap().repr().unwrap(), "9");
        call(&mut rt, &l, "remove", &[Value::new_str("a")]).unwrap();
        call(&mut rt, &l, "reverse", &[]).unwrap();
        assert_eq!(l.repr().unwrap(), "[2, 1, 3]");
    }

    #[test]
    fn error_wording() {
        let mut rt = Runtime::new();
        let l = ints(&[]);
        let err = call(&mut rt, &l, "pop", &[]).unwrap_err();
        assert!(err.matches(&INDEX_ERROR_TYPE));
        assert_eq!(err.to_string(), "IndexError: pop from empty list");
        let err = call(&mut rt, &l, "index", &[Value::int(4)]).unwrap_err();
        assert!(err.matches(&VALUE_ERROR_TYPE));
        assert_eq!(err.to_string(), "ValueError: 4 is not in list");
        let err = call(&mut rt, &l, "append", &[]).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: append() takes exactly one argument (0 given)");
    }

    #[test]
    fn sort_honours_key_and_reverse() {
        let mut rt = Runtime::new();
        let l = ints(&[3, -5, 1]);
        let kw = Dict::new();
        kw.insert(Value::new_str("reverse"), Value::bool(true)).unwrap();
        l.get_attr("sort").unwrap().call(&mut rt, &[], Some(&kw)).unwrap();
        assert_eq!(l.repr().unwrap(), "[3, 1, -5]");
        kw.insert(Value::new_str("key"), BuiltinFunction::value("abs", crate::builtins::math::builtin_abs))
            .unwrap();
        l.get_attr("sort").unwrap().call(&mut rt, &[], Some(&kw)).unwrap();
        assert_eq!(l.repr().unwrap(), "[-5, 3, 1]");
    }

    #[test]
    fn sort_reports_incomparable_items() {
        let mut rt = Runtime::new();
        let l = List::value(vec![Value::int(1), Value::new_str("a")]);
        let err = call(&mut rt, &l, "sort", &[]).unwrap_err();
        assert!(err.matches(&TYPE_ERROR_TYPE));
        assert_eq!(l.len().unwrap(), 2);
    }
}
