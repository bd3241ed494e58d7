//! Exception kinds and exception instances.

use std::fmt;
use std::rc::Rc;

use crate::Runtime;
use crate::core::object::{Kwargs, Object, Value, address_of, fallback_attr, identity_hash};
use crate::core::types::{OBJECT_TYPE, TypeInfo};
use crate::errors::{RunError, RunResult};
use crate::objects::tuple::Tuple;

pub static BASE_EXCEPTION_TYPE: TypeInfo = TypeInfo::with_ctor("BaseException", &OBJECT_TYPE, construct_exception);
pub static EXCEPTION_TYPE: TypeInfo = TypeInfo::with_ctor("Exception", &BASE_EXCEPTION_TYPE, construct_exception);
pub static ARITHMETIC_ERROR_TYPE: TypeInfo = TypeInfo::with_ctor("ArithmeticError", &EXCEPTION_TYPE, construct_exception);
pub static OVERFLOW_ERROR_TYPE: TypeInfo = TypeInfo::with_ctor("OverflowError", &ARITHMETIC_ERROR_TYPE, construct_exception);
pub static ZERO_DIVISION_ERROR_TYPE: TypeInfo =
    TypeInfo::with_ctor("ZeroDivisionError", &ARITHMETIC_ERROR_TYPE, construct_exception);
pub static ASSERTION_ERROR_TYPE: TypeInfo = TypeInfo::with_ctor("AssertionError", &EXCEPTION_TYPE, construct_exception);
pub static ATTRIBUTE_ERROR_TYPE: TypeInfo = TypeInfo::with_ctor("AttributeError", &EXCEPTION_TYPE, construct_exception);
pub static LOOKUP_ERROR_TYPE: TypeInfo = TypeInfo::with_ctor("LookupError", &EXCEPTION_TYPE, construct_exception);
pub static INDEX_ERROR_TYPE: TypeInfo = TypeInfo::with_ctor("IndexError", &LOOKUP_ERROR_TYPE, construct_exception);
pub static KEY_ERROR_TYPE: TypeInfo = TypeInfo::with_ctor("KeyError", &LOOKUP_ERROR_TYPE, construct_exception);
pub static OS_ERROR_TYPE: TypeInfo = TypeInfo::with_ctor("OSError", &EXCEPTION_TYPE, construct_exception);
pub static FILE_NOT_FOUND_ERROR_TYPE: TypeInfo =
    TypeInfo::with_ctor("FileNotFoundError", &OS_ERROR_TYPE, construct_exception);
pub static STOP_ITERATION_TYPE: TypeInfo = TypeInfo::with_ctor("StopIteration", &EXCEPTION_TYPE, construct_exception);
pub static TYPE_ERROR_TYPE: TypeInfo = TypeInfo::with_ctor("TypeError", &EXCEPTION_TYPE, construct_exception);
pub static VALUE_ERROR_TYPE: TypeInfo = TypeInfo::with_ctor("ValueError", &EXCEPTION_TYPE, construct_exception);

/// Every exception kind visible to scripts by name.
pub static EXCEPTION_TYPES: &[&TypeInfo] = &[
    &BASE_EXCEPTION_TYPE,
    &EXCEPTION_TYPE,
    &ARITHMETIC_ERROR_TYPE,
    &OVERFLOW_ERROR_TYPE,
    &ZERO_DIVISION_ERROR_TYPE,
    &ASSERTION_ERROR_TYPE,
    &ATTRIBUTE_ERROR_TYPE,
    &LOOKUP_ERROR_TYPE,
    &INDEX_ERROR_TYPE,
    &KEY_ERROR_TYPE,
    &OS_ERROR_TYPE,
    &FILE_NOT_FOUND_ERROR_TYPE,
    &STOP_ITERATION_TYPE,
    &TYPE_ERROR_TYPE,
    &VALUE_ERROR_TYPE,
];

/// An exception instance: its kind plus the positional constructor arguments.
pub struct Exception {
    kind: &'static TypeInfo,
    args: Vec<Value>,
}

impl Exception {
    pub fn new(kind: &'static TypeInfo, args: Vec<Value>) -> Self {
        Self { kind, args }
    }

    pub fn with_message(kind: &'static TypeInfo, message: String) -> Self {
        Self { kind, args: vec![Value::new_string(message)] }
    }

    pub fn kind(&self) -> &'static TypeInfo {
        self.kind
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Text shown after `Kind: ` when the exception is reported.
    pub fn message(&self) -> RunResult<String> {
        match self.args.as_slice() {
            [] => Ok(String::new()),
            // KeyError shows the missing key as a literal.
            [key] if self.kind.is(&KEY_ERROR_TYPE) => key.repr(),
            [arg] => arg.str(),
            _ => Tuple::from_slice(&self.args).repr(),
        }
    }
}

impl Object for Exception {
    fn type_info(&self) -> &'static TypeInfo {
        self.kind
    }

    fn get_attr(self: Rc<Self>, name: &str) -> RunResult<Value> {
        match name {
            "args" => Ok(Tuple::value(self.args.clone())),
            _ => fallback_attr(self.kind, name),
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
        let mut out = String::from(self.kind.name);
        out.push('(');
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&arg.repr()?);
        }
        out.push(')');
        Ok(out)
    }

    fn str(&self) -> RunResult<String> {
        self.message()
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Ok(msg) if !msg.is_empty() => write!(f, "{}: {}", self.kind.name, msg),
            _ => f.write_str(self.kind.name),
        }
    }
}

impl fmt::Debug for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exception")
            .field("kind", &self.kind.name)
            .field("args", &self.args)
            .finish()
    }
}

fn construct_exception(_rt: &mut Runtime, ty: &'static TypeInfo, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    if kwargs.is_some_and(|k| k.size() > 0) {
        return Err(RunError::type_error(format!("{}() takes no keyword arguments", ty.name)));
    }
    Ok(Value::new(Exception::new(ty, args.to_vec())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repr_and_str() {
        let exc = Value::new(Exception::new(&VALUE_ERROR_TYPE, vec![Value::new_str("bad")]));
        assert_eq!(exc.repr().unwrap(), "ValueError('bad')");
        assert_eq!(exc.str().unwrap(), "bad");

        let exc = Value::new(Exception::new(&KEY_ERROR_TYPE, vec![Value::new_str("k")]));
        assert_eq!(exc.str().unwrap(), "'k'");

        let exc = Value::new(Exception::new(&TYPE_ERROR_TYPE, vec![Value::int(1), Value::int(2)]));
        assert_eq!(exc.str().unwrap(), "(1, 2)");
        assert_eq!(exc.repr().unwrap(), "TypeError(1, 2)");

        let exc = Value::new(Exception::new(&STOP_ITERATION_TYPE, Vec::new()));
        assert_eq!(exc.str().unwrap(), "");
    }

    #[test]
    fn args_attribute_is_a_tuple() {
        let exc = Value::new(Exception::new(&INDEX_ERROR_TYPE, vec![Value::int(4)]));
        assert_eq!(exc.get_attr("args").unwrap().repr().unwrap(), "(4,)");
        assert!(exc.get_attr("__class__").unwrap().is(&INDEX_ERROR_TYPE.value()));
    }

    #[test]
    fn every_kind_derives_from_base_exception() {
        for kind in EXCEPTION_TYPES {
            assert!(kind.is_subtype_of(&BASE_EXCEPTION_TYPE), "{}", kind.name);
        }
    }
}
