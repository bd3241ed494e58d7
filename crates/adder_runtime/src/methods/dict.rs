use std::rc::Rc;

use crate::builtins::common::check_arity;
use crate::core::object::{Kwargs, Value};
use crate::errors::{RunError, RunResult};
use crate::iter::DictIterKind;
use crate::objects::dict::{DICT_TYPE, Dict};
use crate::objects::dict_views::DictView;

use super::MethodKind;
use super::common::arity;

pub(crate) fn supports(kind: MethodKind) -> bool {
    matches!(
        kind,
        MethodKind::Get
            | MethodKind::Keys
            | MethodKind::Values
            | MethodKind::Items
            | MethodKind::Pop
            | MethodKind::SetDefault
            | MethodKind::Update
            | MethodKind::Clear
            | MethodKind::Copy
    )
}

pub(super) fn dispatch(d: &Rc<Dict>, kind: MethodKind, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    match kind {
        MethodKind::Get => {
            arity(kind, args, kwargs, 1, 2)?;
            let found = d.get(&args[0])?;
            Ok(found.or_else(|| args.get(1).cloned()).unwrap_or_else(Value::none))
        }
        MethodKind::Keys => view(d, DictIterKind::Keys, kind, args, kwargs),
        MethodKind::Values => view(d, DictIterKind::Values, kind, args, kwargs),
        MethodKind::Items => view(d, DictIterKind::Items, kind, args, kwargs),
        MethodKind::Pop => {
            arity(kind, args, kwargs, 1, 2)?;
            match (d.remove(&args[0])?, args.get(1)) {
                (Some(v), _) => Ok(v),
                (None, Some(default)) => Ok(default.clone()),
                (None, None) => Err(RunError::key_error(args[0].clone())),
            }
        }
        MethodKind::SetDefault => {
            arity(kind, args, kwargs, 1, 2)?;
            let default = args.get(1).cloned().unwrap_or_else(Value::none);
            d.set_default(args[0].clone(), default)
        }
        MethodKind::Update => {
            check_arity("update", args, 0, 1)?;
            if let Some(src) = args.first() {
                d.update_from(src)?;
            }
            d.update_from_kwargs(kwargs)?;
            Ok(Value::none())
        }
        MethodKind::Clear => {
            arity(kind, args, kwargs, 0, 0)?;
            d.clear();
            Ok(Value::none())
        }
        MethodKind::Copy => {
            arity(kind, args, kwargs, 0, 0)?;
            Ok(d.copy())
        }
        _ => Err(RunError::unsupported(kind.name(), DICT_TYPE.name)),
    }
}

fn view(d: &Rc<Dict>, which: DictIterKind, kind: MethodKind, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    arity(kind, args, kwargs, 0, 0)?;
    Ok(DictView::value(d.clone(), which))
}

#[cfg(test)]
mod tests {
    use crate::Runtime;
    use crate::core::exceptions::KEY_ERROR_TYPE;
    use crate::core::object::Value;
    use crate::errors::RunResult;
    use crate::objects::dict::Dict;

    fn call(rt: &mut Runtime, d: &Value, name: &str, args: &[Value]) -> RunResult<Value> {
        d.get_attr(name)?.call(rt, args, None)
    }

    fn sample() -> Value {
        Dict::from_pairs(vec![(Value::new_str("a"), Value::int(1))]).unwrap()
    }

    #[test]
    fn get_never_raises() {
        let mut rt = Runtime::new();
        let d = sample();
        assert_eq!(call(&mut rt, &d, "get", &[Value::new_str("a")]).unwrap().repr().unwrap(), "1");
        assert!(call(&mut rt, &d, "get", &[Value::new_str("z")]).unwrap().is_none());
        let fallback = call(&mut rt, &d, "get", &[Value::new_str("z"), Value::int(0)]).unwrap();
        assert_eq!(fallback.repr().unwrap(), "0");
    }

    #[test]
    fn pop_and_setdefault() {
        let mut rt = Runtime::new();
        let d = sample();
        assert_eq!(call(&mut rt, &d, "setdefault", &[Value::new_str("b"), Value::int(2)]).unwrap().repr().unwrap(), "2");
        assert_eq!(call(&mut rt, &d, "setdefault", &[Value::new_str("b"), Value::int(7)]).unwrap().repr().unwrap(), "2");
        assert_eq!(call(&mut rt, &d, "pop", &[Value::new_str("a")]).unwrap().repr().unwrap(), "1");
        assert_eq!(call(&mut rt, &d, "pop", &[Value::new_str("a"), Value::none()]).unwrap().repr().unwrap(), "None");
        let err = call(&mut rt, &d, "pop", &[Value::new_str("a")]).unwrap_err();
        assert!(err.matches(&KEY_ERROR_TYPE));
        assert_eq!(d.repr().unwrap(), "{'b': 2}");
    }

    #[test]
    fn views_track_the_dict() {
        let mut rt = Runtime::new();
        let d = sample();
        let keys = call(&mut rt, &d, "keys", &[]).unwrap();
        let items = call(&mut rt, &d, "items", &[]).unwrap();
        d.set_item(&Value::new_str("b"), Value::int(2)).unwrap();
        assert_eq!(keys.repr().unwrap(), "dict_keys(['a', 'b'])");
        assert_eq!(items.repr().unwrap(), "dict_items([('a', 1), ('b', 2)])");
        call(&mut rt, &d, "clear", &[]).unwrap();
        assert_eq!(keys.len().unwrap(), 0);
    }

    #[test]
    fn update_accepts_pairs_and_keywords() {
        let mut rt = Runtime::new();
        let d = sample();
        let kw = Dict::new();
        kw.insert(Value::new_str("c"), Value::int(3)).unwrap();
        let pairs = crate::objects::list::List::value(vec![crate::objects::tuple::Tuple::pair(
            Value::new_str("a"),
            Value::int(9),
        )]);
        d.get_attr("update").unwrap().call(&mut rt, &[pairs], Some(&kw)).unwrap();
        assert_eq!(d.repr().unwrap(), "{'a': 9, 'c': 3}");
        let copy = call(&mut rt, &d, "copy", &[]).unwrap();
        assert!(copy.equals(&d).unwrap());
        assert!(!copy.is(&d));
    }
}
