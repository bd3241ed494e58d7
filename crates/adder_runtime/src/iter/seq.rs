//! Iterators over the built-in sequences and sets.

use std::cell::Cell;
use std::rc::Rc;

use adder_core::Text;

use crate::core::object::{AsAny, Object, Value, address_of, default_repr, identity_hash};
use crate::core::types::{OBJECT_TYPE, TypeInfo};
use crate::errors::RunResult;
use crate::objects::list::List;
use crate::objects::tuple::Tuple;

pub static TUPLE_ITERATOR_TYPE: TypeInfo = TypeInfo::new("tuple_iterator", &OBJECT_TYPE);
pub static LIST_ITERATOR_TYPE: TypeInfo = TypeInfo::new("list_iterator", &OBJECT_TYPE);
pub static STR_ITERATOR_TYPE: TypeInfo = TypeInfo::new("str_iterator", &OBJECT_TYPE);
pub static BYTES_ITERATOR_TYPE: TypeInfo = TypeInfo::new("bytes_iterator", &OBJECT_TYPE);
pub static BYTEARRAY_ITERATOR_TYPE: TypeInfo = TypeInfo::new("bytearray_iterator", &OBJECT_TYPE);
pub static SET_ITERATOR_TYPE: TypeInfo = TypeInfo::new("set_iterator", &OBJECT_TYPE);

pub struct TupleIterator {
    tuple: Rc<Tuple>,
    pos: Cell<usize>,
}

impl TupleIterator {
    pub fn new(tuple: Rc<Tuple>) -> Self {
        TupleIterator { tuple, pos: Cell::new(0) }
    }
}

impl Object for TupleIterator {
    fn type_info(&self) -> &'static TypeInfo {
        &TUPLE_ITERATOR_TYPE
    }

    fn iter(self: Rc<Self>) -> RunResult<Value> {
        Ok(self.into_value())
    }

    fn next(&self) -> RunResult<Option<Value>> {
        let pos = self.pos.get();
        let item = self.tuple.items().get(pos).cloned();
        if item.is_some() {
            self.pos.set(pos + 1);
        }
        Ok(item)
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

/// Live cursor into a list: items appended before exhaustion are visited.
pub struct ListIterator {
    list: Rc<List>,
    pos: Cell<usize>,
    done: Cell<bool>,
}

impl ListIterator {
    pub fn new(list: Rc<List>) -> Self {
        ListIterator { list, pos: Cell::new(0), done: Cell::new(false) }
    }
}

impl Object for ListIterator {
    fn type_info(&self) -> &'static TypeInfo {
        &LIST_ITERATOR_TYPE
    }

    fn iter(self: Rc<Self>) -> RunResult<Value> {
        Ok(self.into_value())
    }

    fn next(&self) -> RunResult<Option<Value>> {
        if self.done.get() {
            return Ok(None);
        }
        let pos = self.pos.get();
        match self.list.get(pos) {
            Some(item) => {
                self.pos.set(pos + 1);
                Ok(Some(item))
            }
            None => {
                self.done.set(true);
                Ok(None)
            }
        }
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

/// Code points of a string. `Text` is immutable, so holding it is a snapshot.
pub struct StrIterator {
    text: Text,
    offset: Cell<usize>,
}

impl StrIterator {
    pub fn new(text: Text) -> Self {
        StrIterator { text, offset: Cell::new(0) }
    }
}

impl Object for StrIterator {
    fn type_info(&self) -> &'static TypeInfo {
        &STR_ITERATOR_TYPE
    }

    fn iter(self: Rc<Self>) -> RunResult<Value> {
        Ok(self.into_value())
    }

    fn next(&self) -> RunResult<Option<Value>> {
        let offset = self.offset.get();
        let Some(c) = self.text.as_str()[offset..].chars().next() else {
            return Ok(None);
        };
        self.offset.set(offset + c.len_utf8());
        Ok(Some(Value::new_text(Text::from_char(c))))
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

/// Bytes of a `bytes` value or of a `bytearray` copied at construction.
pub struct BytesIterator {
    info: &'static TypeInfo,
    data: Rc<[u8]>,
    pos: Cell<usize>,
}

impl BytesIterator {
    pub fn new(info: &'static TypeInfo, data: Rc<[u8]>) -> Self {
        BytesIterator { info, data, pos: Cell::new(0) }
    }
}

impl Object for BytesIterator {
    fn type_info(&self) -> &'static TypeInfo {
        self.info
    }

    fn iter(self: Rc<Self>) -> RunResult<Value> {
        Ok(self.into_value())
    }

    fn next(&self) -> RunResult<Option<Value>> {
        let pos = self.pos.get();
        let Some(&b) = self.data.get(pos) else {
            return Ok(None);
        };
        self.pos.set(pos + 1);
        Ok(Some(Value::int(b as i64)))
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

/// Elements copied at construction.
pub struct SnapshotIterator {
    info: &'static TypeInfo,
    items: Vec<Value>,
    pos: Cell<usize>,
}

impl SnapshotIterator {
    pub fn new(info: &'static TypeInfo, items: Vec<Value>) -> Self {
        SnapshotIterator { info, items, pos: Cell::new(0) }
    }
}

impl Object for SnapshotIterator {
    fn type_info(&self) -> &'static TypeInfo {
        self.info
    }

    fn iter(self: Rc<Self>) -> RunResult<Value> {
        Ok(self.into_value())
    }

    fn next(&self) -> RunResult<Option<Value>> {
        let pos = self.pos.get();
        let item = self.items.get(pos).cloned();
        if item.is_some() {
            self.pos.set(pos + 1);
        }
        Ok(item)
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
