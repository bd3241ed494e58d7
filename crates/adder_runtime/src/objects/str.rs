use std::rc::Rc;

use adder_core::Text;
use adder_core::hash::hash_str;

use crate::Runtime;
use crate::builtins::common::{allowed_kwargs, check_arity, kwarg};
use crate::core::object::{AsAny, Kwargs, Object, Value, fallback_attr};
use crate::core::types::{OBJECT_TYPE, TypeInfo};
use crate::errors::{RunError, RunResult};
use crate::iter::seq::StrIterator;
use crate::methods::{BoundMethod, MethodKind};
use crate::objects::bytes::{ByteArray, Bytes, decode};
use crate::objects::sequence::{CmpOp, SeqKey, normalize_index, repeat_count, seq_key};
use crate::util::format::{format_str, percent_format};
use crate::util::repr::repr_str;

pub static STR_TYPE: TypeInfo = TypeInfo::with_ctor("str", &OBJECT_TYPE, construct_str);

/// Immutable text, indexed by code point.
pub struct Str(Text);

thread_local! {
    static EMPTY_STR: Value = Value::new(Str(Text::new()));
}

impl Value {
    pub fn new_str(s: &str) -> Value {
        if s.is_empty() {
            return EMPTY_STR.with(Value::clone);
        }
        Value::new(Str(Text::from_str(s)))
    }

    pub fn new_string(s: String) -> Value {
        if s.is_empty() {
            return EMPTY_STR.with(Value::clone);
        }
        Value::new(Str(Text::from_string(s)))
    }

    pub fn new_text(t: Text) -> Value {
        if t.is_empty() {
            return EMPTY_STR.with(Value::clone);
        }
        Value::new(Str(t))
    }

    /// The text payload when this is a `str`.
    pub fn as_str(&self) -> Option<&str> {
        self.downcast_ref::<Str>().map(Str::as_str)
    }
}

impl Str {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn text(&self) -> &Text {
        &self.0
    }

    pub fn char_len(&self) -> usize {
        self.0.char_count()
    }

    fn compare(&self, rhs: &Value, op: CmpOp) -> RunResult<bool> {
        match rhs.downcast_ref::<Str>() {
            Some(other) => Ok(op.on_ordering(self.0.cmp(&other.0))),
            None => Err(RunError::comparison_error(op.symbol(), STR_TYPE.name, rhs)),
        }
    }

    fn char_value(&self, index: usize) -> RunResult<Value> {
        match self.0.char_at(index) {
            Some(c) => Ok(Value::new_text(Text::from_char(c))),
            None => Err(RunError::index_error("string index out of range")),
        }
    }
}

impl Object for Str {
    fn type_info(&self) -> &'static TypeInfo {
        &STR_TYPE
    }

    fn add(&self, rhs: &Value) -> RunResult<Value> {
        match rhs.downcast_ref::<Str>() {
            Some(other) => Ok(Value::new_text(self.0.concat(&other.0))),
            None => Err(RunError::type_error(format!(
                "can only concatenate str (not \"{}\") to str",
                rhs.type_name()
            ))),
        }
    }

    fn mul(&self, rhs: &Value) -> RunResult<Value> {
        let n = repeat_count(rhs, self.0.len())?;
        Ok(Value::new_text(self.0.repeat(n)))
    }

    fn modulo(&self, rhs: &Value) -> RunResult<Value> {
        Ok(Value::new_string(percent_format(self.as_str(), rhs)?))
    }

    fn lt(&self, rhs: &Value) -> RunResult<bool> {
        self.compare(rhs, CmpOp::Lt)
    }
    fn le(&self, rhs: &Value) -> RunResult<bool> {
        self.compare(rhs, CmpOp::Le)
    }
    fn gt(&self, rhs: &Value) -> RunResult<bool> {
        self.compare(rhs, CmpOp::Gt)
    }
    fn ge(&self, rhs: &Value) -> RunResult<bool> {
        self.compare(rhs, CmpOp::Ge)
    }

    fn get_item(&self, key: &Value) -> RunResult<Value> {
        let len = self.char_len();
        match seq_key(key, "string")? {
            SeqKey::Index(i) => self.char_value(normalize_index(i, len, "string")?),
            SeqKey::Slice(s) => {
                let idx = s.indices(len)?;
                if self.0.is_ascii() {
                    let bytes = self.as_str().as_bytes();
                    let out: String = idx.positions().map(|p| bytes[p] as char).collect();
                    return Ok(Value::new_string(out));
                }
                let chars: Vec<char> = self.as_str().chars().collect();
                Ok(Value::new_string(idx.positions().map(|p| chars[p]).collect()))
            }
        }
    }

    fn get_attr(self: Rc<Self>, name: &str) -> RunResult<Value> {
        let kind = MethodKind::from_str(name);
        if crate::methods::str::supports(kind) {
            return Ok(BoundMethod::value(self.into_value(), kind));
        }
        fallback_attr(&STR_TYPE, name)
    }

    fn iter(self: Rc<Self>) -> RunResult<Value> {
        Ok(Value::new(StrIterator::new(self.0.clone())))
    }

    fn bool_value(&self) -> RunResult<bool> {
        Ok(!self.0.is_empty())
    }

    fn contains(&self, item: &Value) -> RunResult<bool> {
        match item.downcast_ref::<Str>() {
            Some(needle) => Ok(self.as_str().contains(needle.as_str())),
            None => Err(RunError::type_error(format!(
                "'in <string>' requires string as left operand, not {}",
                item.type_name()
            ))),
        }
    }

    fn equals(&self, rhs: &Value) -> RunResult<bool> {
        Ok(rhs.downcast_ref::<Str>().is_some_and(|other| other.0 == self.0))
    }

    fn hash_code(&self) -> RunResult<i64> {
        Ok(hash_str(self.as_str()))
    }

    fn format(&self, spec: &str) -> RunResult<String> {
        format_str(self.as_str(), spec)
    }

    fn len(&self) -> RunResult<i64> {
        Ok(self.char_len() as i64)
    }

    fn repr(&self) -> RunResult<String> {
        Ok(repr_str(self.as_str()))
    }

    fn str(&self) -> RunResult<String> {
        Ok(self.as_str().to_string())
    }

    fn has_iter(&self) -> bool {
        true
    }

    fn has_len(&self) -> bool {
        true
    }
}

fn construct_str(_rt: &mut Runtime, _ty: &'static TypeInfo, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    allowed_kwargs("str", kwargs, &["encoding", "errors"])?;
    check_arity("str", args, 0, 3)?;
    let encoding = args.get(1).cloned().or_else(|| kwarg(kwargs, "encoding"));
    let Some(obj) = args.first() else {
        return Ok(Value::new_str(""));
    };
    let Some(encoding) = encoding else {
        if obj.downcast_ref::<Str>().is_some() {
            return Ok(obj.clone());
        }
        return Ok(Value::new_string(obj.str()?));
    };
    let encoding = encoding
        .as_str()
        .ok_or_else(|| RunError::type_error(format!("str() argument 'encoding' must be str, not {}", encoding.type_name())))?
        .to_string();
    let raw = if let Some(b) = obj.downcast_ref::<Bytes>() {
        b.data().to_vec()
    } else if let Some(b) = obj.downcast_ref::<ByteArray>() {
        b.snapshot()
    } else {
        return Err(RunError::type_error(format!(
            "decoding to str: need a bytes-like object, {} found",
            obj.type_name()
        )));
    };
    Ok(Value::new_string(decode(&raw, &encoding)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exceptions::{INDEX_ERROR_TYPE, OVERFLOW_ERROR_TYPE, TYPE_ERROR_TYPE};
    use crate::objects::slice::Slice;

    #[test]
    fn indexing_by_code_point() {
        let s = Value::new_str("héllo");
        assert_eq!(s.len().unwrap(), 5);
        assert_eq!(s.get_item(&Value::int(1)).unwrap().str().unwrap(), "é");
        assert_eq!(s.get_item(&Value::int(-1)).unwrap().str().unwrap(), "o");
        assert!(s.get_item(&Value::int(5)).unwrap_err().matches(&INDEX_ERROR_TYPE));
        let sl = Slice::value(Value::int(1), Value::none(), Value::int(2));
        assert_eq!(s.get_item(&sl).unwrap().str().unwrap(), "él");
    }

    #[test]
    fn most_negative_step_takes_the_last_char() {
        let s = Value::new_str("abc");
        let sl = Slice::value(Value::none(), Value::none(), Value::int(i64::MIN));
        assert_eq!(s.get_item(&sl).unwrap().str().unwrap(), "c");
        let sl = Slice::value(Value::none(), Value::none(), Value::int(i64::MAX));
        assert_eq!(s.get_item(&sl).unwrap().str().unwrap(), "a");
    }

    #[test]
    fn oversized_repeat_raises_overflow() {
        let err = Value::new_str("ab").mul(&Value::int(1 << 62)).unwrap_err();
        assert!(err.matches(&OVERFLOW_ERROR_TYPE));
        assert_eq!(err.to_string(), "OverflowError: repeated sequence is too long");
        assert_eq!(Value::new_str("").mul(&Value::int(i64::MAX)).unwrap().str().unwrap(), "");
    }

    #[test]
    fn membership_requires_str() {
        let s = Value::new_str("abc");
        assert!(Value::new_str("bc").is_in(&s).unwrap());
        assert!(!Value::new_str("x").is_in(&s).unwrap());
        assert!(Value::int(1).is_in(&s).unwrap_err().matches(&TYPE_ERROR_TYPE));
    }

    #[test]
    fn operators() {
        let s = Value::new_str("ab");
        assert_eq!(s.add(&Value::new_str("c")).unwrap().str().unwrap(), "abc");
        assert_eq!(s.mul(&Value::int(-1)).unwrap().str().unwrap(), "");
        assert!(s.add(&Value::int(1)).unwrap_err().matches(&TYPE_ERROR_TYPE));
        assert!(s.lt(&Value::new_str("b")).unwrap());
        assert_eq!(
            Value::new_str("%s=%d").modulo(&crate::objects::tuple::Tuple::value(vec![Value::new_str("x"), Value::int(3)]))
                .unwrap()
                .str()
                .unwrap(),
            "x=3"
        );
    }

    #[test]
    fn empty_string_is_shared() {
        assert!(Value::new_str("").is(&Value::new_string(String::new())));
    }
}
