//! Builtin functions callable from generated code.

use std::rc::Rc;

use adder_core::hash::hash_str;

use crate::Runtime;
use crate::core::object::{Kwargs, Object, Value, fallback_attr};
use crate::core::types::{OBJECT_TYPE, TypeInfo};
use crate::errors::RunResult;

pub(crate) mod collection;
pub mod common;
pub(crate) mod core;
pub(crate) mod math;

pub use self::collection::*;
pub use self::core::*;
pub use self::math::*;

pub type BuiltinFn = fn(&mut Runtime, &[Value], Kwargs<'_>) -> RunResult<Value>;

pub static BUILTIN_FUNCTION_TYPE: TypeInfo = TypeInfo::new("builtin_function_or_method", &OBJECT_TYPE);

/// A named native function exposed as a value.
pub struct BuiltinFunction {
    name: &'static str,
    func: BuiltinFn,
}

impl BuiltinFunction {
    pub fn value(name: &'static str, func: BuiltinFn) -> Value {
        Value::from_rc(Rc::new(BuiltinFunction { name, func }))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Object for BuiltinFunction {
    fn type_info(&self) -> &'static TypeInfo {
        &BUILTIN_FUNCTION_TYPE
    }

    fn get_attr(self: Rc<Self>, name: &str) -> RunResult<Value> {
        match name {
            "__name__" => Ok(Value::new_str(self.name)),
            _ => fallback_attr(&BUILTIN_FUNCTION_TYPE, name),
        }
    }

    fn call(&self, rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
        (self.func)(rt, args, kwargs)
    }

    fn bool_value(&self) -> RunResult<bool> {
        Ok(true)
    }

    fn equals(&self, rhs: &Value) -> RunResult<bool> {
        Ok(rhs
            .downcast_ref::<BuiltinFunction>()
            .is_some_and(|other| other.name == self.name && other.func as usize == self.func as usize))
    }

    fn hash_code(&self) -> RunResult<i64> {
        Ok(hash_str(self.name))
    }

    fn repr(&self) -> RunResult<String> {
        Ok(format!("<built-in function {}>", self.name))
    }
}
