//! Lazy arithmetic progressions. Nothing is materialized; the length is
//! computed once in 128-bit arithmetic.

use std::rc::Rc;

use adder_core::hash::combine_ordered;

use crate::Runtime;
use crate::builtins::common::{check_arity, no_kwargs};
use crate::core::object::{Kwargs, Object, Value, fallback_attr};
use crate::core::types::{OBJECT_TYPE, TypeInfo};
use crate::errors::messages::RANGE_STEP_ZERO;
use crate::errors::{RunError, RunResult};
use crate::iter::range::RangeIterator;
use crate::objects::int::as_i64;
use crate::objects::sequence::{SeqKey, seq_key};

pub static RANGE_TYPE: TypeInfo = TypeInfo::with_ctor("range", &OBJECT_TYPE, construct_range);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    start: i64,
    stop: i64,
    step: i64,
    len: i128,
}

fn range_len(start: i64, stop: i64, step: i64) -> i128 {
    let (start, stop, step) = (start as i128, stop as i128, step as i128);
    if step > 0 && start < stop {
        (stop - start - 1) / step + 1
    } else if step < 0 && start > stop {
        (start - stop - 1) / (-step) + 1
    } else {
        0
    }
}

fn narrow(v: i128) -> RunResult<i64> {
    i64::try_from(v).map_err(|_| RunError::overflow("range bound does not fit in 64 bits"))
}

impl Range {
    pub fn new(start: i64, stop: i64, step: i64) -> RunResult<Self> {
        if step == 0 {
            return Err(RunError::value_error(RANGE_STEP_ZERO));
        }
        Ok(Range { start, stop, step, len: range_len(start, stop, step) })
    }

    pub fn value(start: i64, stop: i64, step: i64) -> RunResult<Value> {
        Ok(Value::new(Range::new(start, stop, step)?))
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    /// Number of elements, which may exceed `i64::MAX`.
    pub fn count(&self) -> i128 {
        self.len
    }

    /// The `i`-th element; `i` must be in `0..count()`.
    pub fn nth(&self, i: i128) -> i64 {
        (self.start as i128 + i * self.step as i128) as i64
    }

    fn index_of(&self, v: i64) -> Option<i128> {
        let offset = v as i128 - self.start as i128;
        let step = self.step as i128;
        if offset % step != 0 {
            return None;
        }
        let i = offset / step;
        (0..self.len).contains(&i).then_some(i)
    }

    fn slice(&self, s: &crate::objects::slice::Slice) -> RunResult<Value> {
        let (first, _, stride, count) = s.resolve(self.len)?;
        let step = self.step as i128 * stride;
        let start = self.start as i128 + first * self.step as i128;
        let stop = start + count * step;
        Ok(Value::new(Range::new(narrow(start)?, narrow(stop)?, narrow(step)?)?))
    }
}

impl Object for Range {
    fn type_info(&self) -> &'static TypeInfo {
        &RANGE_TYPE
    }

    fn get_item(&self, key: &Value) -> RunResult<Value> {
        match seq_key(key, "range")? {
            SeqKey::Index(i) => {
                let i = if i < 0 { i as i128 + self.len } else { i as i128 };
                if !(0..self.len).contains(&i) {
                    return Err(RunError::index_error("range object index out of range"));
                }
                Ok(Value::int(self.nth(i)))
            }
            SeqKey::Slice(s) => self.slice(s),
        }
    }

    fn get_attr(self: Rc<Self>, name: &str) -> RunResult<Value> {
        match name {
            "start" => Ok(Value::int(self.start)),
            "stop" => Ok(Value::int(self.stop)),
            "step" => Ok(Value::int(self.step)),
            _ => fallback_attr(&RANGE_TYPE, name),
        }
    }

    fn iter(self: Rc<Self>) -> RunResult<Value> {
        Ok(Value::new(RangeIterator::new(self.start, self.step, self.len)))
    }

    fn bool_value(&self) -> RunResult<bool> {
        Ok(self.len > 0)
    }

    fn contains(&self, item: &Value) -> RunResult<bool> {
        Ok(as_i64(item).is_some_and(|v| self.index_of(v).is_some()))
    }

    /// Ranges compare as the sequences they denote.
    fn equals(&self, rhs: &Value) -> RunResult<bool> {
        let Some(other) = rhs.downcast_ref::<Range>() else {
            return Ok(false);
        };
        if self.len != other.len {
            return Ok(false);
        }
        if self.len == 0 {
            return Ok(true);
        }
        if self.start != other.start {
            return Ok(false);
        }
        Ok(self.len == 1 || self.step == other.step)
    }

    fn hash_code(&self) -> RunResult<i64> {
        let len = self.len as i64;
        let parts = match self.len {
            0 => [0, 0, 0],
            1 => [1, self.start, 0],
            _ => [len, self.start, self.step],
        };
        Ok(combine_ordered(parts))
    }

    fn len(&self) -> RunResult<i64> {
        i64::try_from(self.len).map_err(|_| RunError::overflow("range length does not fit in 64 bits"))
    }

    fn repr(&self) -> RunResult<String> {
        if self.step == 1 {
            Ok(format!("range({}, {})", self.start, self.stop))
        } else {
            Ok(format!("range({}, {}, {})", self.start, self.stop, self.step))
        }
    }

    fn has_iter(&self) -> bool {
        true
    }

    fn has_len(&self) -> bool {
        true
    }
}

fn range_arg(v: &Value) -> RunResult<i64> {
    as_i64(v).ok_or_else(|| {
        RunError::type_error(format!("'{}' object cannot be interpreted as an integer", v.type_name()))
    })
}

fn construct_range(_rt: &mut Runtime, _ty: &'static TypeInfo, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    no_kwargs("range", kwargs)?;
    check_arity("range", args, 1, 3)?;
    let ints = args.iter().map(range_arg).collect::<RunResult<Vec<_>>>()?;
    match ints[..] {
        [stop] => Range::value(0, stop, 1),
        [start, stop] => Range::value(start, stop, 1),
        [start, stop, step] => Range::value(start, stop, step),
        _ => Err(RunError::unsupported("call", RANGE_TYPE.name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exceptions::{INDEX_ERROR_TYPE, OVERFLOW_ERROR_TYPE, VALUE_ERROR_TYPE};
    use crate::objects::slice::Slice;

    #[test]
    fn length_follows_step_sign() {
        assert_eq!(Range::value(5, 0, -2).unwrap().len().unwrap(), 3);
        assert_eq!(Range::value(0, 5, -1).unwrap().len().unwrap(), 0);
        assert_eq!(Range::value(0, 10, 3).unwrap().len().unwrap(), 4);
        assert!(Range::value(0, 1, 0).unwrap_err().matches(&VALUE_ERROR_TYPE));
        let huge = Range::value(i64::MIN, i64::MAX, 1).unwrap();
        assert!(huge.len().unwrap_err().matches(&OVERFLOW_ERROR_TYPE));
        assert_eq!(huge.get_item(&Value::int(-1)).unwrap().repr().unwrap(), (i64::MAX - 1).to_string());
    }

    #[test]
    fn indexing_and_membership() {
        let r = Range::value(5, 0, -2).unwrap();
        assert_eq!(r.get_item(&Value::int(-1)).unwrap().repr().unwrap(), "1");
        assert!(r.get_item(&Value::int(3)).unwrap_err().matches(&INDEX_ERROR_TYPE));
        assert!(Value::int(3).is_in(&r).unwrap());
        assert!(!Value::int(2).is_in(&r).unwrap());
        assert!(!Value::new_str("3").is_in(&r).unwrap());
    }

    #[test]
    fn slicing_yields_a_range() {
        let r = Range::value(0, 10, 1).unwrap();
        let s = Slice::value(Value::int(1), Value::none(), Value::int(3));
        assert_eq!(r.get_item(&s).unwrap().repr().unwrap(), "range(1, 10, 3)");
        let rev = Slice::value(Value::none(), Value::none(), Value::int(-1));
        assert_eq!(r.get_item(&rev).unwrap().repr().unwrap(), "range(9, -1, -1)");
    }

    #[test]
    fn slicing_a_range_longer_than_i64() {
        let huge = Range::value(i64::MIN, i64::MAX, 1).unwrap();
        let head = Slice::value(Value::int(0), Value::int(3), Value::none());
        assert_eq!(
            huge.get_item(&head).unwrap().repr().unwrap(),
            "range(-9223372036854775808, -9223372036854775805)"
        );
        let tail = Slice::value(Value::int(-2), Value::none(), Value::none());
        assert_eq!(
            huge.get_item(&tail).unwrap().repr().unwrap(),
            "range(9223372036854775805, 9223372036854775807)"
        );
    }

    #[test]
    fn equality_by_denoted_sequence() {
        let a = Range::value(0, 3, 2).unwrap();
        let b = Range::value(0, 4, 2).unwrap();
        assert!(a.equals(&b).unwrap());
        assert_eq!(a.hash_code().unwrap(), b.hash_code().unwrap());
        assert!(Range::value(5, 5, 1).unwrap().equals(&Range::value(0, 0, 3).unwrap()).unwrap());
        assert_eq!(a.repr().unwrap(), "range(0, 3, 2)");
    }
}
