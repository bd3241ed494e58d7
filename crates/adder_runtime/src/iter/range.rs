use std::cell::Cell;
use std::rc::Rc;

use crate::core::object::{AsAny, Object, Value, address_of, default_repr, identity_hash};
use crate::core::types::{OBJECT_TYPE, TypeInfo};
use crate::errors::RunResult;

pub static RANGE_ITERATOR_TYPE: TypeInfo = TypeInfo::new("range_iterator", &OBJECT_TYPE);

pub struct RangeIterator {
    next: Cell<i64>,
    step: i64,
    remaining: Cell<i128>,
}

impl RangeIterator {
    pub fn new(start: i64, step: i64, len: i128) -> Self {
        RangeIterator { next: Cell::new(start), step, remaining: Cell::new(len) }
    }
}

impl Object for RangeIterator {
    fn type_info(&self) -> &'static TypeInfo {
        &RANGE_ITERATOR_TYPE
    }

    fn iter(self: Rc<Self>) -> RunResult<Value> {
        Ok(self.into_value())
    }

    fn next(&self) -> RunResult<Option<Value>> {
        let remaining = self.remaining.get();
        if remaining <= 0 {
            return Ok(None);
        }
        let current = self.next.get();
        self.remaining.set(remaining - 1);
        // The step past the last element may leave the i64 range; it is never read.
        self.next.set(current.wrapping_add(self.step));
        Ok(Some(Value::int(current)))
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
    use crate::core::object::Value;
    use crate::objects::range::Range;

    #[test]
    fn walks_down_with_negative_step() {
        let r = Range::value(5, 0, -2).unwrap();
        let items: Vec<String> = r.iterate().unwrap().map(|v| v.unwrap().repr().unwrap()).collect();
        assert_eq!(items, vec!["5", "3", "1"]);
    }

    #[test]
    fn reaches_the_top_of_the_integer_range() {
        let r = Range::value(i64::MAX - 1, i64::MAX, 1).unwrap();
        let items: Vec<Value> = r.to_vec().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].repr().unwrap(), (i64::MAX - 1).to_string());
    }
}
