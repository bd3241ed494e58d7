use std::cell::Cell;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::Runtime;
use crate::builtins::common::no_kwargs;
use crate::core::object::{AsAny, Kwargs, Object, Value, address_of, default_repr, identity_hash};
use crate::core::types::{OBJECT_TYPE, TypeInfo};
use crate::errors::RunResult;
use crate::objects::tuple::Tuple;

pub static ZIP_TYPE: TypeInfo = TypeInfo::with_ctor("zip", &OBJECT_TYPE, construct_zip);

/// Lockstep iteration; stops at the first exhausted input.
pub struct Zip {
    iters: SmallVec<[Value; 4]>,
    done: Cell<bool>,
}

impl Zip {
    pub fn new(iterables: &[Value]) -> RunResult<Self> {
        let iters = iterables.iter().map(Value::iter).collect::<RunResult<SmallVec<_>>>()?;
        Ok(Zip { iters, done: Cell::new(false) })
    }
}

impl Object for Zip {
    fn type_info(&self) -> &'static TypeInfo {
        &ZIP_TYPE
    }

    fn iter(self: Rc<Self>) -> RunResult<Value> {
        Ok(self.into_value())
    }

    fn next(&self) -> RunResult<Option<Value>> {
        if self.done.get() || self.iters.is_empty() {
            return Ok(None);
        }
        let mut row = Vec::with_capacity(self.iters.len());
        for it in &self.iters {
            match it.next()? {
                Some(v) => row.push(v),
                None => {
                    self.done.set(true);
                    return Ok(None);
                }
            }
        }
        Ok(Some(Tuple::value(row)))
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

fn construct_zip(_rt: &mut Runtime, _ty: &'static TypeInfo, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    no_kwargs("zip", kwargs)?;
    Ok(Value::new(Zip::new(args)?))
}
