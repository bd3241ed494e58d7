//! Insertion-ordered hash map.

use std::cell::RefCell;
use std::rc::Rc;

use adder_core::fast_hasher;
use ahash::RandomState;
use indexmap::IndexMap;

use crate::Runtime;
use crate::builtins::common::check_arity;
use crate::core::hash_key::HashKey;
use crate::core::object::{AsAny, Kwargs, Object, Value, address_of, fallback_attr};
use crate::core::types::{OBJECT_TYPE, TypeInfo};
use crate::errors::{RunError, RunResult};
use crate::iter::dict::{DICT_KEY_ITERATOR_TYPE, DictIterator, DictIterKind};
use crate::methods::{BoundMethod, MethodKind};
use crate::objects::str::Str;
use crate::util::repr::guarded;

pub static DICT_TYPE: TypeInfo = TypeInfo::with_ctor("dict", &OBJECT_TYPE, construct_dict);

type Map = IndexMap<HashKey, Value, RandomState>;

/// One element of a dict display: a `key: value` pair or a `**mapping`
/// unpacking whose entries are merged in order.
pub enum DictEntry {
    Pair(Value, Value),
    Unpack(Value),
}

pub struct Dict {
    map: RefCell<Map>,
}

impl Dict {
    pub fn new() -> Self {
        Dict { map: RefCell::new(IndexMap::with_hasher(fast_hasher())) }
    }

    pub fn value() -> Value {
        Value::new(Dict::new())
    }

    pub fn from_pairs(pairs: Vec<(Value, Value)>) -> RunResult<Value> {
        let dict = Dict::new();
        for (k, v) in pairs {
            dict.insert(k, v)?;
        }
        Ok(Value::new(dict))
    }

    /// Builds a dict from a display, later entries overwriting earlier ones.
    pub fn from_entries(entries: Vec<DictEntry>) -> RunResult<Value> {
        let dict = Dict::new();
        for entry in entries {
            match entry {
                DictEntry::Pair(k, v) => dict.insert(k, v)?,
                DictEntry::Unpack(src) => match src.downcast_ref::<Dict>() {
                    Some(other) => {
                        for (k, v) in other.items_snapshot() {
                            dict.insert(k, v)?;
                        }
                    }
                    None => return Err(RunError::unsupported("** unpacking", src.type_name())),
                },
            }
        }
        Ok(Value::new(dict))
    }

    pub fn size(&self) -> usize {
        self.map.borrow().len()
    }

    pub fn get(&self, key: &Value) -> RunResult<Option<Value>> {
        let key = HashKey::new(key.clone())?;
        Ok(self.map.borrow().get(&key).cloned())
    }

    /// Lookup by string key, used for keyword arguments.
    pub fn get_str(&self, key: &str) -> Option<Value> {
        self.get(&Value::new_str(key)).ok().flatten()
    }

    pub fn insert(&self, key: Value, value: Value) -> RunResult<()> {
        let key = HashKey::new(key)?;
        self.map.borrow_mut().insert(key, value);
        Ok(())
    }

    pub fn remove(&self, key: &Value) -> RunResult<Option<Value>> {
        let key = HashKey::new(key.clone())?;
        Ok(self.map.borrow_mut().shift_remove(&key))
    }

    pub fn set_default(&self, key: Value, default: Value) -> RunResult<Value> {
        let key = HashKey::new(key)?;
        let mut map = self.map.borrow_mut();
        Ok(map.entry(key).or_insert(default).clone())
    }

    pub fn clear(&self) {
        self.map.borrow_mut().clear();
    }

    pub fn copy(&self) -> Value {
        Value::new(Dict { map: RefCell::new(self.map.borrow().clone()) })
    }

    pub fn keys_snapshot(&self) -> Vec<Value> {
        self.map.borrow().keys().map(|k| k.value().clone()).collect()
    }

    pub fn values_snapshot(&self) -> Vec<Value> {
        self.map.borrow().values().cloned().collect()
    }

    pub fn items_snapshot(&self) -> Vec<(Value, Value)> {
        self.map
            .borrow()
            .iter()
            .map(|(k, v)| (k.value().clone(), v.clone()))
            .collect()
    }

    /// Entry at insertion position `index`. Used by the live iterators.
    pub fn entry_at(&self, index: usize) -> Option<(Value, Value)> {
        self.map
            .borrow()
            .get_index(index)
            .map(|(k, v)| (k.value().clone(), v.clone()))
    }

    /// Merges a mapping, or an iterable of key/value pairs.
    pub fn update_from(&self, src: &Value) -> RunResult<()> {
        if let Some(other) = src.downcast_ref::<Dict>() {
            for (k, v) in other.items_snapshot() {
                self.insert(k, v)?;
            }
            return Ok(());
        }
        for (i, item) in src.iterate()?.enumerate() {
            let item = item?;
            if !item.has_iter() {
                return Err(RunError::type_error(format!(
                    "cannot convert dictionary update sequence element #{i} to a sequence"
                )));
            }
            let parts = item.to_vec()?;
            let [k, v] = <[Value; 2]>::try_from(parts).map_err(|parts| {
                RunError::value_error(format!(
                    "dictionary update sequence element #{i} has length {}; 2 is required",
                    parts.len()
                ))
            })?;
            self.insert(k, v)?;
        }
        Ok(())
    }

    /// Merges keyword arguments.
    pub fn update_from_kwargs(&self, kwargs: Kwargs<'_>) -> RunResult<()> {
        if let Some(kw) = kwargs {
            for (k, v) in kw.items_snapshot() {
                self.insert(k, v)?;
            }
        }
        Ok(())
    }
}

impl Default for Dict {
    fn default() -> Self {
        Self::new()
    }
}

impl Object for Dict {
    fn type_info(&self) -> &'static TypeInfo {
        &DICT_TYPE
    }

    fn or(&self, rhs: &Value) -> RunResult<Value> {
        let Some(other) = rhs.downcast_ref::<Dict>() else {
            return Err(RunError::operand_error("|", DICT_TYPE.name, rhs));
        };
        let merged = self.copy();
        if let Some(out) = merged.downcast_ref::<Dict>() {
            for (k, v) in other.items_snapshot() {
                out.insert(k, v)?;
            }
        }
        Ok(merged)
    }

    fn get_item(&self, key: &Value) -> RunResult<Value> {
        self.get(key)?.ok_or_else(|| RunError::key_error(key.clone()))
    }

    fn set_item(&self, key: &Value, value: Value) -> RunResult<()> {
        self.insert(key.clone(), value)
    }

    fn del_item(&self, key: &Value) -> RunResult<()> {
        match self.remove(key)? {
            Some(_) => Ok(()),
            None => Err(RunError::key_error(key.clone())),
        }
    }

    fn get_attr(self: Rc<Self>, name: &str) -> RunResult<Value> {
        let kind = MethodKind::from_str(name);
        if crate::methods::dict::supports(kind) {
            return Ok(BoundMethod::value(self.into_value(), kind));
        }
        fallback_attr(&DICT_TYPE, name)
    }

    fn iter(self: Rc<Self>) -> RunResult<Value> {
        Ok(Value::new(DictIterator::new(&DICT_KEY_ITERATOR_TYPE, self, DictIterKind::Keys)))
    }

    fn bool_value(&self) -> RunResult<bool> {
        Ok(self.size() > 0)
    }

    fn contains(&self, item: &Value) -> RunResult<bool> {
        Ok(self.get(item)?.is_some())
    }

    fn equals(&self, rhs: &Value) -> RunResult<bool> {
        let Some(other) = rhs.downcast_ref::<Dict>() else {
            return Ok(false);
        };
        if self.size() != other.size() {
            return Ok(false);
        }
        for (k, v) in self.items_snapshot() {
            match other.get(&k)? {
                Some(theirs) if v.equals(&theirs)? => {}
                _ => return Ok(false),
            }
        }
        Ok(true)
    }

    fn hash_code(&self) -> RunResult<i64> {
        Err(RunError::unhashable(DICT_TYPE.name))
    }

    fn len(&self) -> RunResult<i64> {
        Ok(self.size() as i64)
    }

    fn repr(&self) -> RunResult<String> {
        let items = self.items_snapshot();
        guarded(address_of(self), "{...}", || {
            let mut out = String::from("{");
            for (i, (k, v)) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&k.repr()?);
                out.push_str(": ");
                out.push_str(&v.repr()?);
            }
            out.push('}');
            Ok(out)
        })
    }

    fn has_iter(&self) -> bool {
        true
    }

    fn has_len(&self) -> bool {
        true
    }
}

fn construct_dict(_rt: &mut Runtime, _ty: &'static TypeInfo, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    check_arity("dict", args, 0, 1)?;
    let dict = Dict::new();
    if let Some(src) = args.first() {
        dict.update_from(src)?;
    }
    dict.update_from_kwargs(kwargs)?;
    Ok(Value::new(dict))
}

/// Names of keyword arguments. Generated code only ever passes `str` keys.
pub fn kwarg_names(kwargs: &Dict) -> RunResult<Vec<String>> {
    kwargs
        .keys_snapshot()
        .iter()
        .map(|k| match k.downcast_ref::<Str>() {
            Some(s) => Ok(s.as_str().to_string()),
            None => Err(RunError::type_error("keywords must be strings")),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exceptions::{KEY_ERROR_TYPE, TYPE_ERROR_TYPE, VALUE_ERROR_TYPE};
    use crate::objects::list::List;
    use crate::objects::tuple::Tuple;

    fn sample() -> Value {
        Dict::from_pairs(vec![(Value::new_str("a"), Value::int(1)), (Value::new_str("b"), Value::int(2))]).unwrap()
    }

    #[test]
    fn preserves_insertion_order() {
        let d = sample();
        d.set_item(&Value::new_str("a"), Value::int(3)).unwrap();
        assert_eq!(d.repr().unwrap(), "{'a': 3, 'b': 2}");
        d.del_item(&Value::new_str("a")).unwrap();
        d.set_item(&Value::new_str("a"), Value::int(4)).unwrap();
        assert_eq!(d.repr().unwrap(), "{'b': 2, 'a': 4}");
    }

    #[test]
    fn missing_keys_raise_key_error() {
        let d = sample();
        let err = d.get_item(&Value::new_str("z")).unwrap_err();
        assert!(err.matches(&KEY_ERROR_TYPE));
        assert_eq!(err.to_string(), "KeyError: 'z'");
        assert!(d.del_item(&Value::new_str("z")).unwrap_err().matches(&KEY_ERROR_TYPE));
        let err = d.set_item(&List::value(Vec::new()), Value::int(1)).unwrap_err();
        assert!(err.matches(&TYPE_ERROR_TYPE));
    }

    #[test]
    fn equality_ignores_order() {
        let other =
            Dict::from_pairs(vec![(Value::new_str("b"), Value::int(2)), (Value::new_str("a"), Value::int(1))]).unwrap();
        assert!(sample().equals(&other).unwrap());
        other.set_item(&Value::new_str("a"), Value::int(5)).unwrap();
        assert!(!sample().equals(&other).unwrap());
    }

    #[test]
    fn display_entries_merge_in_order() {
        let d = Dict::from_entries(vec![
            DictEntry::Pair(Value::new_str("a"), Value::int(0)),
            DictEntry::Unpack(sample()),
            DictEntry::Pair(Value::none(), Value::int(9)),
        ])
        .unwrap();
        assert_eq!(d.repr().unwrap(), "{'a': 1, 'b': 2, None: 9}");
        let err = Dict::from_entries(vec![DictEntry::Unpack(Value::int(1))]).unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn update_validates_pairs() {
        let d = Dict::new();
        let bad = List::value(vec![Tuple::value(vec![Value::int(1), Value::int(2), Value::int(3)])]);
        assert!(d.update_from(&bad).unwrap_err().matches(&VALUE_ERROR_TYPE));
        let bad = List::value(vec![Value::int(1)]);
        assert!(d.update_from(&bad).unwrap_err().matches(&TYPE_ERROR_TYPE));
        let good = List::value(vec![Tuple::pair(Value::int(1), Value::int(2))]);
        d.update_from(&good).unwrap();
        assert_eq!(d.size(), 1);
    }

    #[test]
    fn self_referential_repr() {
        let d = Dict::value();
        d.set_item(&Value::new_str("me"), d.clone()).unwrap();
        assert_eq!(d.repr().unwrap(), "{'me': {...}}");
    }
}
