//! Error signalling for the runtime.
//!
//! Two disjoint failure classes flow through `RunResult`:
//! - [`RunError::Raise`] carries a script-level exception that generated
//!   `try`/`except` code may catch.
//! - [`RunError::Unsupported`] marks a coverage gap in the runtime. It is
//!   never turned into a script-visible exception.

use std::rc::Rc;

use adder_core::ArithError;
use thiserror::Error;

use crate::core::exceptions::{self, Exception};
use crate::core::object::Value;
use crate::core::types::{TypeInfo, TypeObject};

/// Common error message constants used throughout the runtime.
pub mod messages {
    pub const INTEGER_OVERFLOW: &str = "integer overflow";
    pub const ZERO_DIVISION: &str = "integer division or modulo by zero";
    pub const NEGATIVE_SHIFT: &str = "negative shift count";
    pub const SLICE_STEP_ZERO: &str = "slice step cannot be zero";
    pub const REPEAT_TOO_LONG: &str = "repeated sequence is too long";
    pub const RANGE_STEP_ZERO: &str = "range() arg 3 must not be zero";
    pub const BYTE_RANGE: &str = "byte must be in range(0, 256)";
    pub const BYTES_RANGE: &str = "bytes must be in range(0, 256)";
    pub const CLOSED_FILE: &str = "I/O operation on closed file.";
    pub const NOT_ENOUGH_FORMAT_ARGS: &str = "not enough arguments for format string";
    pub const TOO_MANY_FORMAT_ARGS: &str = "not all arguments converted during string formatting";
    pub const INCOMPLETE_FORMAT: &str = "incomplete format";
    pub const EMPTY_SEPARATOR: &str = "empty separator";
    pub const SLICE_INDICES: &str = "slice indices must be integers or None or have an __index__ method";
}

#[derive(Error, Debug, Clone)]
pub enum RunError {
    #[error("{0}")]
    Raise(Rc<Exception>),
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

pub type RunResult<T> = Result<T, RunError>;

impl RunError {
    /// Raise `kind` with a single string argument.
    pub fn raise(kind: &'static TypeInfo, message: impl Into<String>) -> Self {
        RunError::Raise(Rc::new(Exception::with_message(kind, message.into())))
    }

    pub fn raise_args(kind: &'static TypeInfo, args: Vec<Value>) -> Self {
        RunError::Raise(Rc::new(Exception::new(kind, args)))
    }

    /// Turns a raised value into the signal. Accepts exception instances and
    /// exception classes, which are instantiated without arguments.
    pub fn from_value(value: &Value) -> Self {
        if let Some(exc) = value.downcast_rc::<Exception>() {
            return RunError::Raise(exc);
        }
        if let Some(t) = value.downcast_ref::<TypeObject>() {
            if t.info.is_subtype_of(&exceptions::BASE_EXCEPTION_TYPE) {
                return RunError::raise_args(t.info, Vec::new());
            }
        }
        RunError::type_error("exceptions must derive from BaseException")
    }

    pub fn unsupported(op: &str, type_name: &str) -> Self {
        RunError::Unsupported(format!("'{op}' unimplemented for '{type_name}'"))
    }

    #[must_use]
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::raise(&exceptions::TYPE_ERROR_TYPE, message)
    }

    #[must_use]
    pub fn value_error(message: impl Into<String>) -> Self {
        Self::raise(&exceptions::VALUE_ERROR_TYPE, message)
    }

    #[must_use]
    pub fn index_error(message: impl Into<String>) -> Self {
        Self::raise(&exceptions::INDEX_ERROR_TYPE, message)
    }

    #[must_use]
    pub fn key_error(key: Value) -> Self {
        Self::raise_args(&exceptions::KEY_ERROR_TYPE, vec![key])
    }

    /// `KeyError` carrying a message rather than a key.
    #[must_use]
    pub fn key_error_message(message: impl Into<String>) -> Self {
        Self::raise(&exceptions::KEY_ERROR_TYPE, message)
    }

    #[must_use]
    pub fn overflow(message: impl Into<String>) -> Self {
        Self::raise(&exceptions::OVERFLOW_ERROR_TYPE, message)
    }

    #[must_use]
    pub fn zero_division(message: impl Into<String>) -> Self {
        Self::raise(&exceptions::ZERO_DIVISION_ERROR_TYPE, message)
    }

    #[must_use]
    pub fn stop_iteration() -> Self {
        Self::raise_args(&exceptions::STOP_ITERATION_TYPE, Vec::new())
    }

    #[must_use]
    pub fn attribute_error(ty: &'static TypeInfo, name: &str) -> Self {
        Self::raise(
            &exceptions::ATTRIBUTE_ERROR_TYPE,
            format!("'{}' object has no attribute '{}'", ty.name, name),
        )
    }

    #[must_use]
    pub fn os_error(kind: &'static TypeInfo, message: impl Into<String>) -> Self {
        Self::raise(kind, message)
    }

    /// `unsupported operand type(s) for +: 'int' and 'str'`
    #[must_use]
    pub fn operand_error(symbol: &str, lhs: &str, rhs: &Value) -> Self {
        Self::type_error(format!(
            "unsupported operand type(s) for {symbol}: '{lhs}' and '{}'",
            rhs.type_name()
        ))
    }

    /// `'<' not supported between instances of 'int' and 'str'`
    #[must_use]
    pub fn comparison_error(symbol: &str, lhs: &str, rhs: &Value) -> Self {
        Self::type_error(format!(
            "'{symbol}' not supported between instances of '{lhs}' and '{}'",
            rhs.type_name()
        ))
    }

    #[must_use]
    pub fn unhashable(type_name: &str) -> Self {
        Self::type_error(format!("unhashable type: '{type_name}'"))
    }

    /// True when this is a raised exception of `kind` or one of its subtypes.
    pub fn matches(&self, kind: &'static TypeInfo) -> bool {
        match self {
            RunError::Raise(exc) => exc.kind().is_subtype_of(kind),
            RunError::Unsupported(_) => false,
        }
    }

    pub fn exception(&self) -> Option<&Rc<Exception>> {
        match self {
            RunError::Raise(exc) => Some(exc),
            RunError::Unsupported(_) => None,
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, RunError::Unsupported(_))
    }
}

impl From<ArithError> for RunError {
    fn from(e: ArithError) -> Self {
        match e {
            ArithError::Overflow => RunError::overflow(messages::INTEGER_OVERFLOW),
            ArithError::ZeroDivision => RunError::zero_division(messages::ZERO_DIVISION),
            ArithError::NegativeShift => RunError::value_error(messages::NEGATIVE_SHIFT),
            ArithError::NegativeExponent => RunError::unsupported("pow with negative exponent", "int"),
        }
    }
}
