use std::rc::Rc;

use adder_core::hash::combine_ordered;

use crate::Runtime;
use crate::builtins::common::{check_arity, no_kwargs};
use crate::core::object::{AsAny, Kwargs, Object, Value, address_of, fallback_attr};
use crate::core::types::{OBJECT_TYPE, TypeInfo};
use crate::errors::{RunError, RunResult};
use crate::iter::seq::TupleIterator;
use crate::methods::{BoundMethod, MethodKind};
use crate::objects::sequence::{
    CmpOp, SeqKey, normalize_index, repeat_count, repeat_values, seq_compare, seq_contains, seq_equals, seq_key, seq_repr,
};

pub static TUPLE_TYPE: TypeInfo = TypeInfo::with_ctor("tuple", &OBJECT_TYPE, construct_tuple);

pub struct Tuple {
    items: Vec<Value>,
}

thread_local! {
    static EMPTY_TUPLE: Value = Value::new(Tuple { items: Vec::new() });
}

impl Tuple {
    pub fn value(items: Vec<Value>) -> Value {
        if items.is_empty() {
            return EMPTY_TUPLE.with(Value::clone);
        }
        Value::new(Tuple { items })
    }

    pub fn from_slice(items: &[Value]) -> Value {
        Self::value(items.to_vec())
    }

    pub fn pair(a: Value, b: Value) -> Value {
        Value::new(Tuple { items: vec![a, b] })
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    fn compare(&self, rhs: &Value, op: CmpOp) -> RunResult<bool> {
        match rhs.downcast_ref::<Tuple>() {
            Some(other) => seq_compare(&self.items, &other.items, op),
            None => Err(RunError::comparison_error(op.symbol(), TUPLE_TYPE.name, rhs)),
        }
    }
}

impl Object for Tuple {
    fn type_info(&self) -> &'static TypeInfo {
        &TUPLE_TYPE
    }

    fn add(&self, rhs: &Value) -> RunResult<Value> {
        let Some(other) = rhs.downcast_ref::<Tuple>() else {
            return Err(RunError::type_error(format!(
                "can only concatenate tuple (not \"{}\") to tuple",
                rhs.type_name()
            )));
        };
        let mut items = Vec::with_capacity(self.items.len() + other.items.len());
        items.extend_from_slice(&self.items);
        items.extend_from_slice(&other.items);
        Ok(Tuple::value(items))
    }

    fn mul(&self, rhs: &Value) -> RunResult<Value> {
        let n = repeat_count(rhs, self.items.len())?;
        Ok(Tuple::value(repeat_values(&self.items, n)))
    }

    fn lt(&self, rhs: &Value) -> RunResult<bool> {
        self.compare(rhs, CmpOp::Lt)
    }
    fn le(&self, rhs: &Value) -> RunResult<bool> {
        self.compare(rhs, CmpOp::Le)
    }
    fn gt(&self, rhs: &Value) -> RunResult<bool> {
        self.compare(rhs, CmpOp::Gt)
    }
    fn ge(&self, rhs: &Value) -> RunResult<bool> {
        self.compare(rhs, CmpOp::Ge)
    }

    fn get_item(&self, key: &Value) -> RunResult<Value> {
        match seq_key(key, "tuple")? {
            SeqKey::Index(i) => Ok(self.items[normalize_index(i, self.items.len(), "tuple")?].clone()),
            SeqKey::Slice(s) => {
                let idx = s.indices(self.items.len())?;
                Ok(Tuple::value(idx.positions().map(|p| self.items[p].clone()).collect()))
            }
        }
    }

    fn get_attr(self: Rc<Self>, name: &str) -> RunResult<Value> {
        let kind = MethodKind::from_str(name);
        if matches!(kind, MethodKind::Count | MethodKind::Index) {
            return Ok(BoundMethod::value(self.into_value(), kind));
        }
        fallback_attr(&TUPLE_TYPE, name)
    }

    fn iter(self: Rc<Self>) -> RunResult<Value> {
        Ok(Value::new(TupleIterator::new(self)))
    }

    fn bool_value(&self) -> RunResult<bool> {
        Ok(!self.items.is_empty())
    }

    fn contains(&self, item: &Value) -> RunResult<bool> {
        seq_contains(&self.items, item)
    }

    fn equals(&self, rhs: &Value) -> RunResult<bool> {
        match rhs.downcast_ref::<Tuple>() {
            Some(other) => seq_equals(&self.items, &other.items),
            None => Ok(false),
        }
    }

    fn hash_code(&self) -> RunResult<i64> {
        let hashes = self.items.iter().map(Value::hash_code).collect::<RunResult<Vec<_>>>()?;
        Ok(combine_ordered(hashes))
    }

    fn len(&self) -> RunResult<i64> {
        Ok(self.items.len() as i64)
    }

    fn repr(&self) -> RunResult<String> {
        if self.items.len() == 1 {
            return Ok(format!("({},)", self.items[0].repr()?));
        }
        seq_repr(&self.items, "(", ")", address_of(self), "(...)")
    }

    fn has_iter(&self) -> bool {
        true
    }

    fn has_len(&self) -> bool {
        true
    }
}

fn construct_tuple(_rt: &mut Runtime, _ty: &'static TypeInfo, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    no_kwargs("tuple", kwargs)?;
    check_arity("tuple", args, 0, 1)?;
    match args.first() {
        None => Ok(Tuple::value(Vec::new())),
        Some(src) if src.downcast_ref::<Tuple>().is_some() => Ok(src.clone()),
        Some(src) => Ok(Tuple::value(src.to_vec()?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exceptions::{INDEX_ERROR_TYPE, OVERFLOW_ERROR_TYPE};

    #[test]
    fn repetition_clones_handles() {
        let t = Tuple::value(vec![Value::new_str("x"), Value::none()]);
        assert_eq!(t.mul(&Value::int(2)).unwrap().repr().unwrap(), "('x', None, 'x', None)");
        assert_eq!(t.mul(&Value::int(0)).unwrap().repr().unwrap(), "()");
        assert!(t.mul(&Value::int(1 << 62)).unwrap_err().matches(&OVERFLOW_ERROR_TYPE));
    }

    #[test]
    fn repr_of_singleton_has_trailing_comma() {
        assert_eq!(Tuple::value(vec![Value::int(1)]).repr().unwrap(), "(1,)");
        assert_eq!(Tuple::value(Vec::new()).repr().unwrap(), "()");
        let t = Tuple::value(vec![Value::int(1), Value::new_str("a"), Value::bool(true)]);
        assert_eq!(t.repr().unwrap(), "(1, 'a', True)");
    }

    #[test]
    fn equal_tuples_hash_equal() {
        let a = Tuple::value(vec![Value::int(1), Value::new_str("x")]);
        let b = Tuple::value(vec![Value::bool(true), Value::new_str("x")]);
        assert!(a.equals(&b).unwrap());
        assert_eq!(a.hash_code().unwrap(), b.hash_code().unwrap());
    }

    #[test]
    fn indexing_and_ordering() {
        let t = Tuple::value(vec![Value::int(1), Value::int(2)]);
        assert_eq!(t.get_item(&Value::int(-1)).unwrap().repr().unwrap(), "2");
        assert!(t.get_item(&Value::int(2)).unwrap_err().matches(&INDEX_ERROR_TYPE));
        let longer = Tuple::value(vec![Value::int(1), Value::int(2), Value::int(0)]);
        assert!(t.lt(&longer).unwrap());
        assert!(Tuple::value(vec![Value::int(3)]).gt(&longer).unwrap());
    }
}
