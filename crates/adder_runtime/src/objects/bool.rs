use adder_core::hash::hash_int;

use crate::Runtime;
use crate::builtins::common::{check_arity, no_kwargs};
use crate::core::object::{Kwargs, Object, Value};
use crate::core::types::TypeInfo;
use crate::errors::RunResult;
use crate::objects::int::{INT_TYPE, IntOp, as_i64, int_binary, int_compare};
use crate::util::format::format_int;

pub static BOOL_TYPE: TypeInfo = TypeInfo::with_ctor("bool", &INT_TYPE, construct_bool);

/// One of the two boolean singletons. Behaves as the integers 0 and 1.
pub struct Bool(pub bool);

thread_local! {
    static TRUE: Value = Value::new(Bool(true));
    static FALSE: Value = Value::new(Bool(false));
}

impl Value {
    pub fn bool(b: bool) -> Value {
        if b { TRUE.with(Value::clone) } else { FALSE.with(Value::clone) }
    }
}

impl Bool {
    fn as_int(&self) -> i64 {
        self.0 as i64
    }

    /// `&`, `|`, `^` stay boolean when both sides are.
    fn logical(&self, op: IntOp, rhs: &Value) -> RunResult<Value> {
        if let Some(other) = rhs.downcast_ref::<Bool>() {
            let b = match op {
                IntOp::And => self.0 & other.0,
                IntOp::Or => self.0 | other.0,
                _ => self.0 ^ other.0,
            };
            return Ok(Value::bool(b));
        }
        int_binary(self.as_int(), &BOOL_TYPE, op, rhs)
    }
}

impl Object for Bool {
    fn type_info(&self) -> &'static TypeInfo {
        &BOOL_TYPE
    }

    fn invert(&self) -> RunResult<Value> {
        Ok(Value::int(!self.as_int()))
    }
    fn pos(&self) -> RunResult<Value> {
        Ok(Value::int(self.as_int()))
    }
    fn neg(&self) -> RunResult<Value> {
        Ok(Value::int(-self.as_int()))
    }
    fn abs(&self) -> RunResult<Value> {
        Ok(Value::int(self.as_int()))
    }

    fn add(&self, rhs: &Value) -> RunResult<Value> {
        int_binary(self.as_int(), &BOOL_TYPE, IntOp::Add, rhs)
    }
    fn and(&self, rhs: &Value) -> RunResult<Value> {
        self.logical(IntOp::And, rhs)
    }
    fn floordiv(&self, rhs: &Value) -> RunResult<Value> {
        int_binary(self.as_int(), &BOOL_TYPE, IntOp::FloorDiv, rhs)
    }
    fn lshift(&self, rhs: &Value) -> RunResult<Value> {
        int_binary(self.as_int(), &BOOL_TYPE, IntOp::LShift, rhs)
    }
    fn modulo(&self, rhs: &Value) -> RunResult<Value> {
        int_binary(self.as_int(), &BOOL_TYPE, IntOp::Mod, rhs)
    }
    fn mul(&self, rhs: &Value) -> RunResult<Value> {
        int_binary(self.as_int(), &BOOL_TYPE, IntOp::Mul, rhs)
    }
    fn or(&self, rhs: &Value) -> RunResult<Value> {
        self.logical(IntOp::Or, rhs)
    }
    fn pow(&self, rhs: &Value) -> RunResult<Value> {
        int_binary(self.as_int(), &BOOL_TYPE, IntOp::Pow, rhs)
    }
    fn rshift(&self, rhs: &Value) -> RunResult<Value> {
        int_binary(self.as_int(), &BOOL_TYPE, IntOp::RShift, rhs)
    }
    fn sub(&self, rhs: &Value) -> RunResult<Value> {
        int_binary(self.as_int(), &BOOL_TYPE, IntOp::Sub, rhs)
    }
    fn xor(&self, rhs: &Value) -> RunResult<Value> {
        self.logical(IntOp::Xor, rhs)
    }

    fn lt(&self, rhs: &Value) -> RunResult<bool> {
        Ok(int_compare(self.as_int(), &BOOL_TYPE, "<", rhs)?.is_lt())
    }
    fn le(&self, rhs: &Value) -> RunResult<bool> {
        Ok(int_compare(self.as_int(), &BOOL_TYPE, "<=", rhs)?.is_le())
    }
    fn gt(&self, rhs: &Value) -> RunResult<bool> {
        Ok(int_compare(self.as_int(), &BOOL_TYPE, ">", rhs)?.is_gt())
    }
    fn ge(&self, rhs: &Value) -> RunResult<bool> {
        Ok(int_compare(self.as_int(), &BOOL_TYPE, ">=", rhs)?.is_ge())
    }

    fn bool_value(&self) -> RunResult<bool> {
        Ok(self.0)
    }

    fn equals(&self, rhs: &Value) -> RunResult<bool> {
        Ok(as_i64(rhs) == Some(self.as_int()))
    }

    fn hash_code(&self) -> RunResult<i64> {
        Ok(hash_int(self.as_int()))
    }

    fn format(&self, spec: &str) -> RunResult<String> {
        if spec.is_empty() {
            return self.repr();
        }
        format_int(self.as_int(), spec)
    }

    fn index_value(&self) -> RunResult<i64> {
        Ok(self.as_int())
    }

    fn int_value(&self) -> RunResult<i64> {
        Ok(self.as_int())
    }

    fn repr(&self) -> RunResult<String> {
        Ok(if self.0 { "True" } else { "False" }.to_string())
    }

    fn has_index(&self) -> bool {
        true
    }
}

fn construct_bool(_rt: &mut Runtime, _ty: &'static TypeInfo, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    no_kwargs("bool", kwargs)?;
    check_arity("bool", args, 0, 1)?;
    match args.first() {
        Some(x) => Ok(Value::bool(x.bool_value()?)),
        None => Ok(Value::bool(false)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adder_core::hash::hash_int;

    #[test]
    fn behaves_as_small_int() {
        let t = Value::bool(true);
        assert!(t.equals(&Value::int(1)).unwrap());
        assert!(Value::int(1).equals(&t).unwrap());
        assert_eq!(t.hash_code().unwrap(), hash_int(1));
        assert_eq!(t.add(&t).unwrap().repr().unwrap(), "2");
        assert_eq!(t.and(&Value::bool(false)).unwrap().repr().unwrap(), "False");
        assert_eq!(t.and(&Value::int(3)).unwrap().repr().unwrap(), "1");
        assert_eq!(t.invert().unwrap().repr().unwrap(), "-2");
        assert!(Value::bool(false).lt(&t).unwrap());
    }

    #[test]
    fn singletons() {
        assert!(Value::bool(true).is(&Value::bool(true)));
        assert!(!Value::bool(true).is(&Value::bool(false)));
        assert_eq!(Value::bool(false).format("").unwrap(), "False");
        assert_eq!(Value::bool(true).format("d").unwrap(), "1");
    }
}
