//! Helpers shared by the indexable kinds.

use std::cmp::Ordering;

use crate::core::object::Value;
use crate::errors::messages::REPEAT_TOO_LONG;
use crate::errors::{RunError, RunResult};
use crate::objects::int::as_i64;
use crate::objects::slice::Slice;
use crate::util::repr::guarded;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    pub(crate) fn symbol(self) -> &'static str {
        match self {
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }

    pub(crate) fn on_values(self, a: &Value, b: &Value) -> RunResult<bool> {
        match self {
            CmpOp::Lt => a.lt(b),
            CmpOp::Le => a.le(b),
            CmpOp::Gt => a.gt(b),
            CmpOp::Ge => a.ge(b),
        }
    }

    pub(crate) fn on_ordering(self, ord: Ordering) -> bool {
        match self {
            CmpOp::Lt => ord.is_lt(),
            CmpOp::Le => ord.is_le(),
            CmpOp::Gt => ord.is_gt(),
            CmpOp::Ge => ord.is_ge(),
        }
    }
}

pub(crate) enum SeqKey<'a> {
    Index(i64),
    Slice(&'a Slice),
}

pub(crate) fn seq_key<'a>(key: &'a Value, kind: &str) -> RunResult<SeqKey<'a>> {
    if let Some(i) = as_i64(key) {
        return Ok(SeqKey::Index(i));
    }
    if let Some(s) = key.downcast_ref::<Slice>() {
        return Ok(SeqKey::Slice(s));
    }
    Err(RunError::type_error(format!(
        "{kind} indices must be integers or slices, not {}",
        key.type_name()
    )))
}

/// Resolves a possibly negative index against `len`.
pub(crate) fn normalize_index(i: i64, len: usize, kind: &str) -> RunResult<usize> {
    let adjusted = if i < 0 { i + len as i64 } else { i };
    if adjusted < 0 || adjusted >= len as i64 {
        return Err(RunError::index_error(format!("{kind} index out of range")));
    }
    Ok(adjusted as usize)
}

/// Count operand of `seq * n` for a sequence of `len` units; negative counts
/// yield an empty sequence. A product past the allocator's limit raises
/// OverflowError.
pub(crate) fn repeat_count(rhs: &Value, len: usize) -> RunResult<usize> {
    let n = match as_i64(rhs) {
        Some(n) => n.max(0) as usize,
        None => {
            return Err(RunError::type_error(format!(
                "can't multiply sequence by non-int of type '{}'",
                rhs.type_name()
            )));
        }
    };
    match len.checked_mul(n) {
        Some(total) if total <= isize::MAX as usize => Ok(n),
        _ => Err(RunError::overflow(REPEAT_TOO_LONG)),
    }
}

/// `items` concatenated `n` times.
pub(crate) fn repeat_values(items: &[Value], n: usize) -> Vec<Value> {
    let mut out = Vec::with_capacity(items.len() * n);
    for _ in 0..n {
        out.extend(items.iter().cloned());
    }
    out
}

pub(crate) fn seq_equals(a: &[Value], b: &[Value]) -> RunResult<bool> {
    if a.len() != b.len() {
        return Ok(false);
    }
    for (x, y) in a.iter().zip(b) {
        if !x.equals(y)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Lexicographic comparison: the first unequal pair decides, else the lengths.
pub(crate) fn seq_compare(a: &[Value], b: &[Value], op: CmpOp) -> RunResult<bool> {
    for (x, y) in a.iter().zip(b) {
        if !x.equals(y)? {
            return op.on_values(x, y);
        }
    }
    Ok(op.on_ordering(a.len().cmp(&b.len())))
}

pub(crate) fn seq_contains(items: &[Value], needle: &Value) -> RunResult<bool> {
    for item in items {
        if item.equals(needle)? {
            return Ok(true);
        }
    }
    Ok(false)
}

pub(crate) fn seq_count(items: &[Value], needle: &Value) -> RunResult<i64> {
    let mut n = 0;
    for item in items {
        if item.equals(needle)? {
            n += 1;
        }
    }
    Ok(n)
}

/// Position of `needle` within `items[start..stop]` (bounds clamped like slices).
pub(crate) fn seq_index(items: &[Value], needle: &Value, start: i64, stop: i64, kind: &str) -> RunResult<i64> {
    let len = items.len() as i64;
    let clamp = |i: i64| if i < 0 { (i + len).max(0) } else { i.min(len) };
    let (start, stop) = (clamp(start), clamp(stop));
    for i in start..stop {
        if items[i as usize].equals(needle)? {
            return Ok(i);
        }
    }
    Err(RunError::value_error(format!("{} is not in {kind}", needle.repr()?)))
}

/// `open item, item close`, with `placeholder` for self-references.
pub(crate) fn seq_repr(items: &[Value], open: &str, close: &str, addr: usize, placeholder: &str) -> RunResult<String> {
    guarded(addr, placeholder, || {
        let mut out = String::from(open);
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&item.repr()?);
        }
        out.push_str(close);
        Ok(out)
    })
}
