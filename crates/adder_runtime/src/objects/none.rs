use crate::core::object::{Object, Value};
use crate::core::types::{OBJECT_TYPE, TypeInfo};
use crate::errors::RunResult;

pub static NONE_TYPE: TypeInfo = TypeInfo::new("NoneType", &OBJECT_TYPE);

pub struct NoneObject;

thread_local! {
    static NONE: Value = Value::new(NoneObject);
}

impl Value {
    pub fn none() -> Value {
        NONE.with(Value::clone)
    }

    pub fn is_none(&self) -> bool {
        self.downcast_ref::<NoneObject>().is_some()
    }
}

impl Object for NoneObject {
    fn type_info(&self) -> &'static TypeInfo {
        &NONE_TYPE
    }

    fn bool_value(&self) -> RunResult<bool> {
        Ok(false)
    }

    fn equals(&self, rhs: &Value) -> RunResult<bool> {
        Ok(rhs.is_none())
    }

    fn hash_code(&self) -> RunResult<i64> {
        Ok(0)
    }

    fn repr(&self) -> RunResult<String> {
        Ok("None".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singleton() {
        assert!(Value::none().is(&Value::none()));
        assert!(!Value::none().bool_value().unwrap());
        assert!(!Value::none().equals(&Value::int(0)).unwrap());
        assert_eq!(Value::none().repr().unwrap(), "None");
    }
}
