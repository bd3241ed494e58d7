use crate::builtins::common::no_kwargs;
use crate::core::object::{Kwargs, Value};
use crate::errors::{RunError, RunResult};
use crate::objects::set::{SET_TYPE, Set};

use super::MethodKind;
use super::common::arity;

pub(crate) fn supports(kind: MethodKind) -> bool {
    matches!(
        kind,
        MethodKind::Add
            | MethodKind::Discard
            | MethodKind::Remove
            | MethodKind::Update
            | MethodKind::Clear
            | MethodKind::Copy
            | MethodKind::Pop
    )
}

pub(super) fn dispatch(s: &Set, kind: MethodKind, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    match kind {
        MethodKind::Add => {
            arity(kind, args, kwargs, 1, 1)?;
            s.add(args[0].clone())?;
            Ok(Value::none())
        }
        MethodKind::Discard => {
            arity(kind, args, kwargs, 1, 1)?;
            s.discard(&args[0])?;
            Ok(Value::none())
        }
        MethodKind::Remove => {
            arity(kind, args, kwargs, 1, 1)?;
            s.remove(&args[0])?;
            Ok(Value::none())
        }
        MethodKind::Update => {
            no_kwargs("set.update", kwargs)?;
            for src in args {
                s.update(src)?;
            }
            Ok(Value::none())
        }
        MethodKind::Clear => {
            arity(kind, args, kwargs, 0, 0)?;
            s.clear();
            Ok(Value::none())
        }
        MethodKind::Copy => {
            arity(kind, args, kwargs, 0, 0)?;
            Ok(s.copy())
        }
        MethodKind::Pop => {
            arity(kind, args, kwargs, 0, 0)?;
            s.pop()
        }
        _ => Err(RunError::unsupported(kind.name(), SET_TYPE.name)),
    }
}

#[cfg(test)]
mod tests {
    use crate::Runtime;
    use crate::core::exceptions::{KEY_ERROR_TYPE, TYPE_ERROR_TYPE};
    use crate::core::object::Value;
    use crate::errors::RunResult;
    use crate::objects::list::List;
    use crate::objects::set::Set;

    fn call(rt: &mut Runtime, s: &Value, name: &str, args: &[Value]) -> RunResult<Value> {
        s.get_attr(name)?.call(rt, args, None)
    }

    #[test]
    fn add_discard_remove() {
        let mut rt = Runtime::new();
        let s = Value::new(Set::new());
        call(&mut rt, &s, "add", &[Value::int(1)]).unwrap();
        call(&mut rt, &s, "add", &[Value::int(1)]).unwrap();
        assert_eq!(s.len().unwrap(), 1);
        call(&mut rt, &s, "discard", &[Value::int(5)]).unwrap();
        let err = call(&mut rt, &s, "remove", &[Value::int(5)]).unwrap_err();
        assert!(err.matches(&KEY_ERROR_TYPE));
        assert_eq!(err.to_string(), "KeyError: 5");
        let err = call(&mut rt, &s, "add", &[List::value(Vec::new())]).unwrap_err();
        assert!(err.matches(&TYPE_ERROR_TYPE));
    }

    #[test]
    fn update_takes_several_iterables() {
        let mut rt = Runtime::new();
        let s = Value::new(Set::new());
        call(&mut rt, &s, "update", &[Value::new_str("ab"), List::value(vec![Value::int(1)])]).unwrap();
        assert_eq!(s.len().unwrap(), 3);
        let copy = call(&mut rt, &s, "copy", &[]).unwrap();
        call(&mut rt, &s, "clear", &[]).unwrap();
        assert_eq!(copy.len().unwrap(), 3);
        assert_eq!(s.repr().unwrap(), "set()");
    }

    #[test]
    fn pop_from_empty_set() {
        let mut rt = Runtime::new();
        let s = Value::new(Set::new());
        let err = call(&mut rt, &s, "pop", &[]).unwrap_err();
        assert_eq!(err.to_string(), "KeyError: 'pop from an empty set'");
    }
}
