use crate::core::object::{Kwargs, Value};
use crate::errors::{RunError, RunResult};
use crate::objects::sequence::{seq_count, seq_index};
use crate::objects::tuple::{TUPLE_TYPE, Tuple};

use super::MethodKind;
use super::common::{arity, opt_int};

/// `index(x[, start[, stop]])` over a slice of items.
pub(super) fn index_of(items: &[Value], args: &[Value], kind: &str) -> RunResult<Value> {
    let start = opt_int(args, 1)?.unwrap_or(0);
    let stop = opt_int(args, 2)?.unwrap_or(i64::MAX);
    Ok(Value::int(seq_index(items, &args[0], start, stop, kind)?))
}

pub(super) fn dispatch(t: &Tuple, kind: MethodKind, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    match kind {
        MethodKind::Count => {
            arity(kind, args, kwargs, 1, 1)?;
            Ok(Value::int(seq_count(t.items(), &args[0])?))
        }
        MethodKind::Index => {
            arity(kind, args, kwargs, 1, 3)?;
            index_of(t.items(), args, "tuple")
        }
        _ => Err(RunError::unsupported(kind.name(), TUPLE_TYPE.name)),
    }
}
