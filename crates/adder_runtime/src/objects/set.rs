use std::cell::RefCell;
use std::rc::Rc;

use adder_core::FastHashSet;
use adder_core::hash::fast_set_with_capacity;

use crate::Runtime;
use crate::builtins::common::{check_arity, no_kwargs};
use crate::core::hash_key::HashKey;
use crate::core::object::{AsAny, Kwargs, Object, Value, address_of, fallback_attr};
use crate::core::types::{OBJECT_TYPE, TypeInfo};
use crate::errors::{RunError, RunResult};
use crate::iter::seq::{SET_ITERATOR_TYPE, SnapshotIterator};
use crate::methods::{BoundMethod, MethodKind};
use crate::util::repr::guarded;

pub static SET_TYPE: TypeInfo = TypeInfo::with_ctor("set", &OBJECT_TYPE, construct_set);

/// Mutable hash set. Iteration order is unspecified.
pub struct Set {
    items: RefCell<FastHashSet<HashKey>>,
}

impl Set {
    pub fn new() -> Self {
        Set { items: RefCell::new(fast_set_with_capacity(0)) }
    }

    pub fn value_from(items: FastHashSet<HashKey>) -> Value {
        Value::new(Set { items: RefCell::new(items) })
    }

    /// Builds a set literal. Fails on the first unhashable item.
    pub fn value(items: Vec<Value>) -> RunResult<Value> {
        let set = Set::new();
        for item in items {
            set.add(item)?;
        }
        Ok(Value::new(set))
    }

    pub fn from_iterable(src: &Value) -> RunResult<Value> {
        let set = Set::new();
        set.update(src)?;
        Ok(Value::new(set))
    }

    pub fn size(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn snapshot(&self) -> Vec<Value> {
        self.items.borrow().iter().map(|k| k.value().clone()).collect()
    }

    fn keys(&self) -> FastHashSet<HashKey> {
        self.items.borrow().clone()
    }

    pub fn add(&self, item: Value) -> RunResult<()> {
        let key = HashKey::new(item)?;
        self.items.borrow_mut().insert(key);
        Ok(())
    }

    pub fn discard(&self, item: &Value) -> RunResult<bool> {
        let key = HashKey::new(item.clone())?;
        Ok(self.items.borrow_mut().remove(&key))
    }

    pub fn remove(&self, item: &Value) -> RunResult<()> {
        if self.discard(item)? {
            Ok(())
        } else {
            Err(RunError::key_error(item.clone()))
        }
    }

    pub fn has(&self, item: &Value) -> RunResult<bool> {
        let key = HashKey::new(item.clone())?;
        Ok(self.items.borrow().contains(&key))
    }

    /// Adds every item of `src`; `src` may be this set.
    pub fn update(&self, src: &Value) -> RunResult<()> {
        let extra: Vec<HashKey> = match src.downcast_ref::<Set>() {
            Some(other) => other.keys().into_iter().collect(),
            None => src.iterate()?.map(|v| HashKey::new(v?)).collect::<RunResult<Vec<_>>>()?,
        };
        self.items.borrow_mut().extend(extra);
        Ok(())
    }

    pub fn clear(&self) {
        self.items.borrow_mut().clear();
    }

    pub fn copy(&self) -> Value {
        Set::value_from(self.keys())
    }

    pub fn pop(&self) -> RunResult<Value> {
        let mut items = self.items.borrow_mut();
        let Some(key) = items.iter().next().cloned() else {
            return Err(RunError::key_error_message("pop from an empty set"));
        };
        items.remove(&key);
        Ok(key.into_value())
    }

    fn is_subset_of(&self, other: &Set) -> bool {
        let mine = self.items.borrow();
        let theirs = other.items.borrow();
        mine.len() <= theirs.len() && mine.iter().all(|k| theirs.contains(k))
    }

    fn operand<'a>(&self, symbol: &str, rhs: &'a Value) -> RunResult<&'a Set> {
        rhs.downcast_ref::<Set>()
            .ok_or_else(|| RunError::operand_error(symbol, SET_TYPE.name, rhs))
    }

    fn ordering<'a>(&self, symbol: &str, rhs: &'a Value) -> RunResult<&'a Set> {
        rhs.downcast_ref::<Set>()
            .ok_or_else(|| RunError::comparison_error(symbol, SET_TYPE.name, rhs))
    }
}

/// Collects into a deterministically seeded set.
fn collect_keys(keys: impl Iterator<Item = HashKey>) -> FastHashSet<HashKey> {
    let mut out = fast_set_with_capacity(keys.size_hint().0);
    out.extend(keys);
    out
}

impl Default for Set {
    fn default() -> Self {
        Self::new()
    }
}

impl Object for Set {
    fn type_info(&self) -> &'static TypeInfo {
        &SET_TYPE
    }

    fn or(&self, rhs: &Value) -> RunResult<Value> {
        let other = self.operand("|", rhs)?;
        let mut out = self.keys();
        out.extend(other.keys());
        Ok(Set::value_from(out))
    }

    fn and(&self, rhs: &Value) -> RunResult<Value> {
        let other = self.operand("&", rhs)?;
        let theirs = other.keys();
        Ok(Set::value_from(collect_keys(self.keys().into_iter().filter(|k| theirs.contains(k)))))
    }

    fn sub(&self, rhs: &Value) -> RunResult<Value> {
        let other = self.operand("-", rhs)?;
        let theirs = other.keys();
        Ok(Set::value_from(collect_keys(self.keys().into_iter().filter(|k| !theirs.contains(k)))))
    }

    fn xor(&self, rhs: &Value) -> RunResult<Value> {
        let other = self.operand("^", rhs)?;
        let (mine, theirs) = (self.keys(), other.keys());
        let mut out = collect_keys(mine.iter().filter(|k| !theirs.contains(*k)).cloned());
        out.extend(theirs.iter().filter(|k| !mine.contains(*k)).cloned());
        Ok(Set::value_from(out))
    }

    fn or_in_place(self: Rc<Self>, rhs: &Value) -> RunResult<Value> {
        let other = self.operand("|=", rhs)?;
        let extra = other.keys();
        self.items.borrow_mut().extend(extra);
        Ok(self.into_value())
    }

    fn and_in_place(self: Rc<Self>, rhs: &Value) -> RunResult<Value> {
        let theirs = self.operand("&=", rhs)?.keys();
        self.items.borrow_mut().retain(|k| theirs.contains(k));
        Ok(self.into_value())
    }

    fn sub_in_place(self: Rc<Self>, rhs: &Value) -> RunResult<Value> {
        let theirs = self.operand("-=", rhs)?.keys();
        self.items.borrow_mut().retain(|k| !theirs.contains(k));
        Ok(self.into_value())
    }

    fn xor_in_place(self: Rc<Self>, rhs: &Value) -> RunResult<Value> {
        let merged = self.xor(rhs)?;
        if let Some(set) = merged.downcast_ref::<Set>() {
            *self.items.borrow_mut() = set.keys();
        }
        Ok(self.into_value())
    }

    fn lt(&self, rhs: &Value) -> RunResult<bool> {
        let other = self.ordering("<", rhs)?;
        Ok(self.size() < other.size() && self.is_subset_of(other))
    }
    fn le(&self, rhs: &Value) -> RunResult<bool> {
        let other = self.ordering("<=", rhs)?;
        Ok(self.is_subset_of(other))
    }
    fn gt(&self, rhs: &Value) -> RunResult<bool> {
        let other = self.ordering(">", rhs)?;
        Ok(other.size() < self.size() && other.is_subset_of(self))
    }
    fn ge(&self, rhs: &Value) -> RunResult<bool> {
        let other = self.ordering(">=", rhs)?;
        Ok(other.is_subset_of(self))
    }

    fn get_attr(self: Rc<Self>, name: &str) -> RunResult<Value> {
        let kind = MethodKind::from_str(name);
        if crate::methods::set::supports(kind) {
            return Ok(BoundMethod::value(self.into_value(), kind));
        }
        fallback_attr(&SET_TYPE, name)
    }

    fn iter(self: Rc<Self>) -> RunResult<Value> {
        Ok(Value::new(SnapshotIterator::new(&SET_ITERATOR_TYPE, self.snapshot())))
    }

    fn bool_value(&self) -> RunResult<bool> {
        Ok(self.size() > 0)
    }

    fn contains(&self, item: &Value) -> RunResult<bool> {
        self.has(item)
    }

    fn equals(&self, rhs: &Value) -> RunResult<bool> {
        match rhs.downcast_ref::<Set>() {
            Some(other) => Ok(self.size() == other.size() && self.is_subset_of(other)),
            None => Ok(false),
        }
    }

    fn hash_code(&self) -> RunResult<i64> {
        Err(RunError::unhashable(SET_TYPE.name))
    }

    fn len(&self) -> RunResult<i64> {
        Ok(self.size() as i64)
    }

    fn repr(&self) -> RunResult<String> {
        let items = self.snapshot();
        if items.is_empty() {
            return Ok("set()".to_string());
        }
        guarded(address_of(self), "set(...)", || {
            let parts = items.iter().map(Value::repr).collect::<RunResult<Vec<_>>>()?;
            Ok(format!("{{{}}}", parts.join(", ")))
        })
    }

    fn has_iter(&self) -> bool {
        true
    }

    fn has_len(&self) -> bool {
        true
    }
}

fn construct_set(_rt: &mut Runtime, _ty: &'static TypeInfo, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    no_kwargs("set", kwargs)?;
    check_arity("set", args, 0, 1)?;
    match args.first() {
        None => Ok(Value::new(Set::new())),
        Some(src) => Set::from_iterable(src),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exceptions::{KEY_ERROR_TYPE, TYPE_ERROR_TYPE};
    use crate::objects::list::List;

    fn set_of(values: &[i64]) -> Value {
        Set::from_iterable(&List::value(values.iter().map(|&i| Value::int(i)).collect())).unwrap()
    }

    #[test]
    fn deduplicates_equal_values() {
        let s = set_of(&[1, 1, 2]);
        assert_eq!(s.len().unwrap(), 2);
        s.downcast_ref::<Set>().unwrap().add(Value::bool(true)).unwrap();
        assert_eq!(s.len().unwrap(), 2);
        assert!(Value::int(2).is_in(&s).unwrap());
    }

    #[test]
    fn operators() {
        let a = set_of(&[1, 2, 3]);
        let b = set_of(&[2, 3, 4]);
        assert!(a.and(&b).unwrap().equals(&set_of(&[2, 3])).unwrap());
        assert!(a.or(&b).unwrap().equals(&set_of(&[1, 2, 3, 4])).unwrap());
        assert!(a.sub(&b).unwrap().equals(&set_of(&[1])).unwrap());
        assert!(a.xor(&b).unwrap().equals(&set_of(&[1, 4])).unwrap());
        assert!(set_of(&[2]).lt(&a).unwrap());
        assert!(!a.lt(&a).unwrap());
        assert!(a.le(&a).unwrap());
        assert!(a.or(&Value::int(1)).unwrap_err().matches(&TYPE_ERROR_TYPE));
    }

    #[test]
    fn unhashable_elements_and_missing_keys() {
        let s = Value::new(Set::new());
        let set = s.downcast_ref::<Set>().unwrap();
        assert!(set.add(List::value(Vec::new())).unwrap_err().matches(&TYPE_ERROR_TYPE));
        assert!(set.remove(&Value::int(1)).unwrap_err().matches(&KEY_ERROR_TYPE));
        assert!(set.pop().unwrap_err().matches(&KEY_ERROR_TYPE));
        assert_eq!(s.repr().unwrap(), "set()");
        set.add(Value::new_str("a")).unwrap();
        assert_eq!(s.repr().unwrap(), "{'a'}");
    }
}
