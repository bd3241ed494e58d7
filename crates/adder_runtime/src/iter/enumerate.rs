use std::cell::Cell;
use std::rc::Rc;

use crate::Runtime;
use crate::builtins::common::{allowed_kwargs, check_arity, kwarg};
use crate::core::object::{AsAny, Kwargs, Object, Value, address_of, default_repr, identity_hash};
use crate::core::types::{OBJECT_TYPE, TypeInfo};
use crate::errors::messages::INTEGER_OVERFLOW;
use crate::errors::{RunError, RunResult};
use crate::objects::int::as_i64;
use crate::objects::tuple::Tuple;

pub static ENUMERATE_TYPE: TypeInfo = TypeInfo::with_ctor("enumerate", &OBJECT_TYPE, construct_enumerate);

pub struct Enumerate {
    inner: Value,
    // `None` once the counter has stepped past `i64::MAX`.
    count: Cell<Option<i64>>,
}

impl Enumerate {
    pub fn new(iterable: &Value, start: i64) -> RunResult<Self> {
        Ok(Enumerate { inner: iterable.iter()?, count: Cell::new(Some(start)) })
    }
}

impl Object for Enumerate {
    fn type_info(&self) -> &'static TypeInfo {
        &ENUMERATE_TYPE
    }

    fn iter(self: Rc<Self>) -> RunResult<Value> {
        Ok(self.into_value())
    }

    fn next(&self) -> RunResult<Option<Value>> {
        let Some(item) = self.inner.next()? else {
            return Ok(None);
        };
        let Some(n) = self.count.get() else {
            return Err(RunError::overflow(INTEGER_OVERFLOW));
        };
        self.count.set(n.checked_add(1));
        Ok(Some(Tuple::pair(Value::int(n), item)))
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

fn construct_enumerate(_rt: &mut Runtime, _ty: &'static TypeInfo, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    allowed_kwargs("enumerate", kwargs, &["iterable", "start"])?;
    check_arity("enumerate", args, 0, 2)?;
    let Some(iterable) = args.first().cloned().or_else(|| kwarg(kwargs, "iterable")) else {
        return Err(RunError::type_error("enumerate() missing required argument 'iterable'"));
    };
    let start = match args.get(1).cloned().or_else(|| kwarg(kwargs, "start")) {
        None => 0,
        Some(v) => as_i64(&v).ok_or_else(|| {
            RunError::type_error(format!("'{}' object cannot be interpreted as an integer", v.type_name()))
        })?,
    };
    Ok(Value::new(Enumerate::new(&iterable, start)?))
}
