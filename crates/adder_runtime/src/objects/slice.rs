use std::rc::Rc;

use adder_core::hash::combine_ordered;

use crate::Runtime;
use crate::builtins::common::{check_arity, no_kwargs};
use crate::core::object::{Kwargs, Object, Value, fallback_attr};
use crate::core::types::{OBJECT_TYPE, TypeInfo};
use crate::errors::messages::{SLICE_INDICES, SLICE_STEP_ZERO};
use crate::errors::{RunError, RunResult};
use crate::objects::int::as_i64;

pub static SLICE_TYPE: TypeInfo = TypeInfo::with_ctor("slice", &OBJECT_TYPE, construct_slice);

/// `start:stop:step`, each bound possibly `None`.
pub struct Slice {
    start: Value,
    stop: Value,
    step: Value,
}

/// Bounds resolved against a concrete length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceIndices {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
    pub len: usize,
}

impl SliceIndices {
    /// Positions selected by the slice, in order.
    pub fn positions(&self) -> impl Iterator<Item = usize> + use<> {
        let SliceIndices { start, step, len, .. } = *self;
        (0..len).map(move |k| (start as i128 + k as i128 * step as i128) as usize)
    }
}

impl Slice {
    pub fn new(start: Value, stop: Value, step: Value) -> Self {
        Self { start, stop, step }
    }

    pub fn value(start: Value, stop: Value, step: Value) -> Value {
        Value::new(Self::new(start, stop, step))
    }

    fn bound(v: &Value) -> RunResult<Option<i64>> {
        if v.is_none() {
            return Ok(None);
        }
        as_i64(v).map(Some).ok_or_else(|| RunError::type_error(SLICE_INDICES))
    }

    /// Clamps the bounds to a sequence of `len` elements.
    pub fn indices(&self, len: usize) -> RunResult<SliceIndices> {
        let (start, stop, step, count) = self.resolve(len as i128)?;
        // Clamped bounds lie in -1..=len and the count never exceeds len.
        Ok(SliceIndices { start: start as i64, stop: stop as i64, step: step as i64, len: count as usize })
    }

    /// `(start, stop, step, count)` for a length that may exceed `i64::MAX`.
    /// All arithmetic is 128-bit, so neither `len` nor `step == i64::MIN`
    /// can overflow.
    pub(crate) fn resolve(&self, len: i128) -> RunResult<(i128, i128, i128, i128)> {
        let step = Self::bound(&self.step)?.unwrap_or(1) as i128;
        if step == 0 {
            return Err(RunError::value_error(SLICE_STEP_ZERO));
        }
        let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };
        let clamp = |v: Option<i64>, default: i128| -> i128 {
            match v.map(i128::from) {
                None => default,
                Some(i) if i < 0 => (i + len).max(lower),
                Some(i) => i.min(upper),
            }
        };
        let start = clamp(Self::bound(&self.start)?, if step < 0 { upper } else { lower });
        let stop = clamp(Self::bound(&self.stop)?, if step < 0 { lower } else { upper });

        let count = if step < 0 {
            if stop < start { (start - stop - 1) / (-step) + 1 } else { 0 }
        } else if start < stop {
            (stop - start - 1) / step + 1
        } else {
            0
        };
        Ok((start, stop, step, count))
    }

    fn parts(&self) -> [&Value; 3] {
        [&self.start, &self.stop, &self.step]
    }
}

impl Object for Slice {
    fn type_info(&self) -> &'static TypeInfo {
        &SLICE_TYPE
    }

    fn get_attr(self: Rc<Self>, name: &str) -> RunResult<Value> {
        match name {
            "start" => Ok(self.start.clone()),
            "stop" => Ok(self.stop.clone()),
            "step" => Ok(self.step.clone()),
            _ => fallback_attr(&SLICE_TYPE, name),
        }
    }

    fn bool_value(&self) -> RunResult<bool> {
        Ok(true)
    }

    fn equals(&self, rhs: &Value) -> RunResult<bool> {
        let Some(other) = rhs.downcast_ref::<Slice>() else {
            return Ok(false);
        };
        for (a, b) in self.parts().into_iter().zip(other.parts()) {
            if !a.equals(b)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn hash_code(&self) -> RunResult<i64> {
        let hashes = self.parts().into_iter().map(Value::hash_code).collect::<RunResult<Vec<_>>>()?;
        Ok(combine_ordered(hashes))
    }

    fn repr(&self) -> RunResult<String> {
        Ok(format!("slice({}, {}, {})", self.start.repr()?, self.stop.repr()?, self.step.repr()?))
    }
}

fn construct_slice(_rt: &mut Runtime, _ty: &'static TypeInfo, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    no_kwargs("slice", kwargs)?;
    check_arity("slice", args, 1, 3)?;
    Ok(match args {
        [stop] => Slice::value(Value::none(), stop.clone(), Value::none()),
        [start, stop] => Slice::value(start.clone(), stop.clone(), Value::none()),
        [start, stop, step] => Slice::value(start.clone(), stop.clone(), step.clone()),
        _ => unreachable!("arity checked above"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(start: Option<i64>, stop: Option<i64>, step: Option<i64>, len: usize) -> SliceIndices {
        let v = |o: Option<i64>| o.map(Value::int).unwrap_or_else(Value::none);
        Slice::new(v(start), v(stop), v(step)).indices(len).unwrap()
    }

    #[test]
    fn clamping_matches_sequence_semantics() {
        let s = idx(None, None, None, 5);
        assert_eq!(s.positions().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        let s = idx(None, None, Some(-1), 5);
        assert_eq!(s.positions().collect::<Vec<_>>(), vec![4, 3, 2, 1, 0]);
        let s = idx(Some(-2), None, None, 5);
        assert_eq!(s.positions().collect::<Vec<_>>(), vec![3, 4]);
        let s = idx(Some(1), Some(100), Some(2), 5);
        assert_eq!(s.positions().collect::<Vec<_>>(), vec![1, 3]);
        let s = idx(Some(-100), Some(2), None, 5);
        assert_eq!(s.positions().collect::<Vec<_>>(), vec![0, 1]);
        let s = idx(Some(3), Some(1), None, 5);
        assert_eq!(s.len, 0);
    }

    #[test]
    fn extreme_steps_do_not_overflow() {
        let s = idx(None, None, Some(i64::MIN), 3);
        assert_eq!(s.positions().collect::<Vec<_>>(), vec![2]);
        let s = idx(None, None, Some(i64::MAX), 3);
        assert_eq!(s.positions().collect::<Vec<_>>(), vec![0]);
        let s = idx(Some(i64::MIN), Some(i64::MAX), Some(i64::MIN), 4);
        assert_eq!(s.len, 0);
        let s = idx(Some(i64::MAX), Some(i64::MIN), Some(-1), 4);
        assert_eq!(s.positions().collect::<Vec<_>>(), vec![3, 2, 1, 0]);
    }

    #[test]
    fn zero_step_is_rejected() {
        let s = Slice::new(Value::none(), Value::none(), Value::int(0));
        assert!(s.indices(3).is_err());
    }

    #[test]
    fn repr_shows_all_bounds() {
        let s = Slice::value(Value::int(1), Value::int(2), Value::none());
        assert_eq!(s.repr().unwrap(), "slice(1, 2, None)");
        assert!(s.get_attr("step").unwrap().is_none());
    }
}
