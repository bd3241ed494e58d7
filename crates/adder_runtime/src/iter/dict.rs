//! Live cursors over dict entries.

use std::cell::Cell;
use std::rc::Rc;

use crate::core::object::{AsAny, Object, Value, address_of, default_repr, identity_hash};
use crate::core::types::{OBJECT_TYPE, TypeInfo};
use crate::errors::RunResult;
use crate::objects::dict::Dict;
use crate::objects::tuple::Tuple;

pub static DICT_KEY_ITERATOR_TYPE: TypeInfo = TypeInfo::new("dict_keyiterator", &OBJECT_TYPE);
pub static DICT_VALUE_ITERATOR_TYPE: TypeInfo = TypeInfo::new("dict_valueiterator", &OBJECT_TYPE);
pub static DICT_ITEM_ITERATOR_TYPE: TypeInfo = TypeInfo::new("dict_itemiterator", &OBJECT_TYPE);

/// Which projection of an entry a view or iterator yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictIterKind {
    Keys,
    Values,
    Items,
}

/// Walks entries by insertion position. Mutation during iteration is not
/// detected: entries added before exhaustion are visited, and removals shift
/// the remaining entries under the cursor.
pub struct DictIterator {
    info: &'static TypeInfo,
    dict: Rc<Dict>,
    kind: DictIterKind,
    pos: Cell<usize>,
    done: Cell<bool>,
}

impl DictIterator {
    pub fn new(info: &'static TypeInfo, dict: Rc<Dict>, kind: DictIterKind) -> Self {
        DictIterator { info, dict, kind, pos: Cell::new(0), done: Cell::new(false) }
    }
}

impl Object for DictIterator {
    fn type_info(&self) -> &'static TypeInfo {
        self.info
    }

    fn iter(self: Rc<Self>) -> RunResult<Value> {
        Ok(self.into_value())
    }

    fn next(&self) -> RunResult<Option<Value>> {
        if self.done.get() {
            return Ok(None);
        }
        let pos = self.pos.get();
        let Some((k, v)) = self.dict.entry_at(pos) else {
            self.done.set(true);
            return Ok(None);
        };
        self.pos.set(pos + 1);
        Ok(Some(match self.kind {
            DictIterKind::Keys => k,
            DictIterKind::Values => v,
            DictIterKind::Items => Tuple::pair(k, v),
        }))
    }

    fn bool_value(&self) -> RunResult<bool> {
        Ok(true)
    }

    fn equals(&self, rhs: &Value) -> RunResult<bool> {
        Ok(address_of(self) == rhs.addr())
    }

    fn hash_code(&self) -> RunResult<i64> {
        Ok(identity_hash(self))
    }

    fn repr(&self) -> RunResult<String> {
        Ok(default_repr(self))
    }

    fn has_iter(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterating_a_dict_yields_keys_in_insertion_order() {
        let d = Dict::from_pairs(vec![(Value::int(2), Value::new_str("b")), (Value::int(1), Value::new_str("a"))])
            .unwrap();
        let keys: Vec<String> = d.iterate().unwrap().map(|k| k.unwrap().repr().unwrap()).collect();
        assert_eq!(keys, vec!["2", "1"]);
        assert_eq!(d.iter().unwrap().type_name(), "dict_keyiterator");
    }

    #[test]
    fn exhaustion_is_terminal() {
        let d = Dict::value();
        let it = d.iter().unwrap();
        assert!(it.next().unwrap().is_none());
        d.set_item(&Value::int(1), Value::int(1)).unwrap();
        assert!(it.next().unwrap().is_none());
    }
}
