use std::cell::Cell;
use std::rc::Rc;

use crate::Runtime;
use crate::builtins::common::{check_arity, no_kwargs};
use crate::core::exceptions::INDEX_ERROR_TYPE;
use crate::core::object::{AsAny, Kwargs, Object, Value, address_of, default_repr, identity_hash};
use crate::core::types::{OBJECT_TYPE, TypeInfo};
use crate::errors::{RunError, RunResult};
use crate::objects::dict::Dict;
use crate::objects::is_repeatable;
use crate::objects::range::Range;

pub static REVERSED_TYPE: TypeInfo = TypeInfo::with_ctor("reversed", &OBJECT_TYPE, construct_reversed);

/// Walks `len-1 .. 0` through `get_item`, so the source must be indexable by
/// position, not merely iterable.
pub struct Reversed {
    seq: Value,
    // Next position to read; negative once exhausted.
    index: Cell<i64>,
}

impl Reversed {
    pub fn new(seq: &Value) -> RunResult<Self> {
        if seq.downcast_ref::<Dict>().is_some() {
            return Err(RunError::unsupported("reversed", seq.type_name()));
        }
        if !(is_repeatable(seq) || seq.downcast_ref::<Range>().is_some()) {
            return Err(RunError::type_error(format!("'{}' object is not reversible", seq.type_name())));
        }
        let len = seq.len()?;
        Ok(Reversed { seq: seq.clone(), index: Cell::new(len - 1) })
    }
}

impl Object for Reversed {
    fn type_info(&self) -> &'static TypeInfo {
        &REVERSED_TYPE
    }

    fn iter(self: Rc<Self>) -> RunResult<Value> {
        Ok(self.into_value())
    }

    fn next(&self) -> RunResult<Option<Value>> {
        let index = self.index.get();
        if index < 0 {
            return Ok(None);
        }
        self.index.set(index - 1);
        match self.seq.get_item(&Value::int(index)) {
            Ok(item) => Ok(Some(item)),
            // The sequence shrank underneath us.
            Err(e) if e.matches(&INDEX_ERROR_TYPE) => {
                self.index.set(-1);
                Ok(None)
            }
            Err(e) => Err(e),
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

fn construct_reversed(_rt: &mut Runtime, _ty: &'static TypeInfo, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    no_kwargs("reversed", kwargs)?;
    check_arity("reversed", args, 1, 1)?;
    Ok(Value::new(Reversed::new(&args[0])?))
}
