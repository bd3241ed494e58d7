//! Live `keys()`, `values()` and `items()` views.

use std::rc::Rc;

use crate::core::object::{Object, Value, address_of, identity_hash};
use crate::core::types::{OBJECT_TYPE, TypeInfo};
use crate::errors::{RunError, RunResult};
use crate::iter::dict::{
    DICT_ITEM_ITERATOR_TYPE, DICT_KEY_ITERATOR_TYPE, DICT_VALUE_ITERATOR_TYPE, DictIterKind, DictIterator,
};
use crate::objects::dict::Dict;
use crate::objects::sequence::seq_contains;
use crate::objects::tuple::Tuple;
use crate::util::repr::guarded;

pub static DICT_KEYS_TYPE: TypeInfo = TypeInfo::new("dict_keys", &OBJECT_TYPE);
pub static DICT_VALUES_TYPE: TypeInfo = TypeInfo::new("dict_values", &OBJECT_TYPE);
pub static DICT_ITEMS_TYPE: TypeInfo = TypeInfo::new("dict_items", &OBJECT_TYPE);

/// Read-through projection of a dict. Holds the dict itself, never a copy.
pub struct DictView {
    dict: Rc<Dict>,
    kind: DictIterKind,
}

impl DictView {
    pub fn value(dict: Rc<Dict>, kind: DictIterKind) -> Value {
        Value::new(DictView { dict, kind })
    }

    pub fn kind(&self) -> DictIterKind {
        self.kind
    }

    fn elements(&self) -> Vec<Value> {
        match self.kind {
            DictIterKind::Keys => self.dict.keys_snapshot(),
            DictIterKind::Values => self.dict.values_snapshot(),
            DictIterKind::Items => self
                .dict
                .items_snapshot()
                .into_iter()
                .map(|(k, v)| Tuple::pair(k, v))
                .collect(),
        }
    }
}

impl Object for DictView {
    fn type_info(&self) -> &'static TypeInfo {
        match self.kind {
            DictIterKind::Keys => &DICT_KEYS_TYPE,
            DictIterKind::Values => &DICT_VALUES_TYPE,
            DictIterKind::Items => &DICT_ITEMS_TYPE,
        }
    }

    fn iter(self: Rc<Self>) -> RunResult<Value> {
        let info = match self.kind {
            DictIterKind::Keys => &DICT_KEY_ITERATOR_TYPE,
            DictIterKind::Values => &DICT_VALUE_ITERATOR_TYPE,
            DictIterKind::Items => &DICT_ITEM_ITERATOR_TYPE,
        };
        Ok(Value::new(DictIterator::new(info, self.dict.clone(), self.kind)))
    }

    fn bool_value(&self) -> RunResult<bool> {
        Ok(self.dict.size() > 0)
    }

    fn contains(&self, item: &Value) -> RunResult<bool> {
        match self.kind {
            DictIterKind::Keys => Ok(self.dict.get(item)?.is_some()),
            DictIterKind::Values => seq_contains(&self.dict.values_snapshot(), item),
            DictIterKind::Items => {
                let Some(pair) = item.downcast_ref::<Tuple>() else {
                    return Ok(false);
                };
                let [k, v] = pair.items() else {
                    return Ok(false);
                };
                // An unhashable key cannot be present.
                match self.dict.get(k) {
                    Ok(Some(found)) => found.equals(v),
                    Ok(None) => Ok(false),
                    Err(e) if e.is_unsupported() => Err(e),
                    Err(_) => Ok(false),
                }
            }
        }
    }

    fn equals(&self, rhs: &Value) -> RunResult<bool> {
        let Some(other) = rhs.downcast_ref::<DictView>() else {
            return Ok(false);
        };
        if self.kind != other.kind || matches!(self.kind, DictIterKind::Values) {
            return Ok(address_of(self) == address_of(other));
        }
        let mine = self.elements();
        if mine.len() as i64 != other.len()? {
            return Ok(false);
        }
        for item in &mine {
            if !other.contains(item)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn hash_code(&self) -> RunResult<i64> {
        match self.kind {
            DictIterKind::Values => Ok(identity_hash(self)),
            _ => Err(RunError::unhashable(self.type_info().name)),
        }
    }

    fn len(&self) -> RunResult<i64> {
        Ok(self.dict.size() as i64)
    }

    fn repr(&self) -> RunResult<String> {
        let name = self.type_info().name;
        let items = self.elements();
        guarded(address_of(self), "...", || {
            let parts = items.iter().map(Value::repr).collect::<RunResult<Vec<_>>>()?;
            Ok(format!("{name}([{}])", parts.join(", ")))
        })
    }

    fn has_iter(&self) -> bool {
        true
    }

    fn has_len(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict_with_a() -> Rc<Dict> {
        let d = Dict::from_pairs(vec![(Value::new_str("a"), Value::int(1))]).unwrap();
        d.downcast_rc::<Dict>().unwrap()
    }

    #[test]
    fn views_track_later_inserts() {
        let dict = dict_with_a();
        let keys = DictView::value(dict.clone(), DictIterKind::Keys);
        let items = DictView::value(dict.clone(), DictIterKind::Items);
        dict.insert(Value::new_str("b"), Value::int(2)).unwrap();
        assert_eq!(keys.len().unwrap(), 2);
        assert_eq!(keys.repr().unwrap(), "dict_keys(['a', 'b'])");
        assert_eq!(items.repr().unwrap(), "dict_items([('a', 1), ('b', 2)])");
        assert!(Value::new_str("b").is_in(&keys).unwrap());
    }

    #[test]
    fn items_membership_checks_the_value() {
        let dict = dict_with_a();
        let items = DictView::value(dict, DictIterKind::Items);
        assert!(Tuple::pair(Value::new_str("a"), Value::int(1)).is_in(&items).unwrap());
        assert!(!Tuple::pair(Value::new_str("a"), Value::int(2)).is_in(&items).unwrap());
        assert!(!Value::int(1).is_in(&items).unwrap());
    }

    #[test]
    fn values_view() {
        let dict = dict_with_a();
        let values = DictView::value(dict, DictIterKind::Values);
        assert_eq!(values.repr().unwrap(), "dict_values([1])");
        assert!(Value::int(1).is_in(&values).unwrap());
    }
}
