//! Immutable `bytes` and mutable `bytearray`.

use std::cell::RefCell;
use std::rc::Rc;

use adder_core::hash::hash_bytes;

use crate::Runtime;
use crate::builtins::common::{allowed_kwargs, check_arity, kwarg};
use crate::core::exceptions::LOOKUP_ERROR_TYPE;
use crate::core::object::{AsAny, Kwargs, Object, Value, fallback_attr};
use crate::core::types::{OBJECT_TYPE, TypeInfo};
use crate::errors::messages::{BYTE_RANGE, BYTES_RANGE};
use crate::errors::{RunError, RunResult};
use crate::iter::seq::{BYTEARRAY_ITERATOR_TYPE, BYTES_ITERATOR_TYPE, BytesIterator};
use crate::methods::{BoundMethod, MethodKind};
use crate::objects::int::as_i64;
use crate::objects::sequence::{CmpOp, SeqKey, normalize_index, repeat_count, seq_key};
use crate::objects::str::Str;
use crate::util::repr::repr_bytes;

pub static BYTES_TYPE: TypeInfo = TypeInfo::with_ctor("bytes", &OBJECT_TYPE, construct_bytes);
pub static BYTEARRAY_TYPE: TypeInfo = TypeInfo::with_ctor("bytearray", &OBJECT_TYPE, construct_bytearray);

pub struct Bytes {
    data: Rc<[u8]>,
}

pub struct ByteArray {
    data: RefCell<Vec<u8>>,
}

impl Bytes {
    pub fn value(data: Vec<u8>) -> Value {
        Value::new(Bytes { data: Rc::from(data) })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl ByteArray {
    pub fn value(data: Vec<u8>) -> Value {
        Value::new(ByteArray { data: RefCell::new(data) })
    }

    pub fn snapshot(&self) -> Vec<u8> {
        self.data.borrow().clone()
    }

    pub fn push(&self, byte: u8) {
        self.data.borrow_mut().push(byte);
    }

    pub fn extend_from(&self, src: &Value) -> RunResult<()> {
        // Materialize first: `src` may be this very bytearray.
        let extra = bytes_from_iterable(src)?;
        self.data.borrow_mut().extend_from_slice(&extra);
        Ok(())
    }

    pub fn clear(&self) {
        self.data.borrow_mut().clear();
    }
}

/// Contents of a `bytes` or `bytearray`.
pub fn bytes_like(v: &Value) -> Option<Vec<u8>> {
    if let Some(b) = v.downcast_ref::<Bytes>() {
        return Some(b.data.to_vec());
    }
    v.downcast_ref::<ByteArray>().map(ByteArray::snapshot)
}

/// Validates one element of a byte sequence.
pub fn byte_of(v: &Value, message: &str) -> RunResult<u8> {
    let i = as_i64(v).ok_or_else(|| {
        RunError::type_error(format!("'{}' object cannot be interpreted as an integer", v.type_name()))
    })?;
    u8::try_from(i).map_err(|_| RunError::value_error(message))
}

pub fn bytes_from_iterable(src: &Value) -> RunResult<Vec<u8>> {
    if let Some(raw) = bytes_like(src) {
        return Ok(raw);
    }
    src.iterate()?.map(|item| byte_of(&item?, BYTES_RANGE)).collect()
}

fn normalize_encoding(encoding: &str) -> String {
    encoding.trim().to_ascii_lowercase().replace('_', "-")
}

pub fn encode(s: &str, encoding: &str) -> RunResult<Vec<u8>> {
    match normalize_encoding(encoding).as_str() {
        "utf-8" | "utf8" => Ok(s.as_bytes().to_vec()),
        "ascii" | "latin-1" | "latin1" | "iso-8859-1" => {
            let limit = if encoding.eq_ignore_ascii_case("ascii") { 0x80 } else { 0x100 };
            s.chars()
                .enumerate()
                .map(|(pos, c)| {
                    if (c as u32) < limit {
                        Ok(c as u8)
                    } else {
                        Err(RunError::value_error(format!(
                            "'{encoding}' codec can't encode character {:?} in position {pos}",
                            c
                        )))
                    }
                })
                .collect()
        }
        _ => Err(RunError::raise(&LOOKUP_ERROR_TYPE, format!("unknown encoding: {encoding}"))),
    }
}

pub fn decode(raw: &[u8], encoding: &str) -> RunResult<String> {
    match normalize_encoding(encoding).as_str() {
        "utf-8" | "utf8" => match std::str::from_utf8(raw) {
            Ok(s) => Ok(s.to_string()),
            Err(e) => {
                let pos = e.valid_up_to();
                Err(RunError::value_error(format!(
                    "'utf-8' codec can't decode byte {:#04x} in position {pos}",
                    raw[pos]
                )))
            }
        },
        "ascii" => match raw.iter().position(|b| !b.is_ascii()) {
            Some(pos) => Err(RunError::value_error(format!(
                "'ascii' codec can't decode byte {:#04x} in position {pos}",
                raw[pos]
            ))),
            None => Ok(raw.iter().map(|&b| b as char).collect()),
        },
        "latin-1" | "latin1" | "iso-8859-1" => Ok(raw.iter().map(|&b| b as char).collect()),
        _ => Err(RunError::raise(&LOOKUP_ERROR_TYPE, format!("unknown encoding: {encoding}"))),
    }
}

pub fn hex_string(raw: &[u8]) -> String {
    let mut out = String::with_capacity(raw.len() * 2);
    for b in raw {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

fn find_sub(hay: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || hay.windows(needle.len()).any(|w| w == needle)
}

fn contains_in(hay: &[u8], item: &Value) -> RunResult<bool> {
    if let Some(i) = as_i64(item) {
        let b = u8::try_from(i).map_err(|_| RunError::value_error(BYTE_RANGE))?;
        return Ok(hay.contains(&b));
    }
    match bytes_like(item) {
        Some(needle) => Ok(find_sub(hay, &needle)),
        None => Err(RunError::type_error(format!(
            "a bytes-like object is required, not '{}'",
            item.type_name()
        ))),
    }
}

fn compare_bytes(lhs: &[u8], lhs_type: &'static TypeInfo, rhs: &Value, op: CmpOp) -> RunResult<bool> {
    match bytes_like(rhs) {
        Some(other) => Ok(op.on_ordering(lhs.cmp(other.as_slice()))),
        None => Err(RunError::comparison_error(op.symbol(), lhs_type.name, rhs)),
    }
}

fn concat_operand(lhs_type: &'static TypeInfo, rhs: &Value) -> RunResult<Vec<u8>> {
    bytes_like(rhs).ok_or_else(|| {
        RunError::type_error(format!("can't concat {} to {}", rhs.type_name(), lhs_type.name))
    })
}

impl Object for Bytes {
    fn type_info(&self) -> &'static TypeInfo {
        &BYTES_TYPE
    }

    fn add(&self, rhs: &Value) -> RunResult<Value> {
        let mut out = self.data.to_vec();
        out.extend_from_slice(&concat_operand(&BYTES_TYPE, rhs)?);
        Ok(Bytes::value(out))
    }

    fn mul(&self, rhs: &Value) -> RunResult<Value> {
        let n = repeat_count(rhs, self.data.len())?;
        Ok(Bytes::value(self.data.repeat(n)))
    }

    fn lt(&self, rhs: &Value) -> RunResult<bool> {
        compare_bytes(&self.data, &BYTES_TYPE, rhs, CmpOp::Lt)
    }
    fn le(&self, rhs: &Value) -> RunResult<bool> {
        compare_bytes(&self.data, &BYTES_TYPE, rhs, CmpOp::Le)
    }
    fn gt(&self, rhs: &Value) -> RunResult<bool> {
        compare_bytes(&self.data, &BYTES_TYPE, rhs, CmpOp::Gt)
    }
    fn ge(&self, rhs: &Value) -> RunResult<bool> {
        compare_bytes(&self.data, &BYTES_TYPE, rhs, CmpOp::Ge)
    }

    fn get_item(&self, key: &Value) -> RunResult<Value> {
        match seq_key(key, "byte")? {
            SeqKey::Index(i) => Ok(Value::int(self.data[normalize_index(i, self.data.len(), "index")?] as i64)),
            SeqKey::Slice(s) => {
                let idx = s.indices(self.data.len())?;
                Ok(Bytes::value(idx.positions().map(|p| self.data[p]).collect()))
            }
        }
    }

    fn get_attr(self: Rc<Self>, name: &str) -> RunResult<Value> {
        let kind = MethodKind::from_str(name);
        if crate::methods::bytes::supports_bytes(kind) {
            return Ok(BoundMethod::value(self.into_value(), kind));
        }
        fallback_attr(&BYTES_TYPE, name)
    }

    fn iter(self: Rc<Self>) -> RunResult<Value> {
        Ok(Value::new(BytesIterator::new(&BYTES_ITERATOR_TYPE, self.data.clone())))
    }

    fn bool_value(&self) -> RunResult<bool> {
        Ok(!self.data.is_empty())
    }

    fn contains(&self, item: &Value) -> RunResult<bool> {
        contains_in(&self.data, item)
    }

    fn equals(&self, rhs: &Value) -> RunResult<bool> {
        Ok(bytes_like(rhs).is_some_and(|other| *self.data == *other))
    }

    fn hash_code(&self) -> RunResult<i64> {
        Ok(hash_bytes(&self.data))
    }

    fn len(&self) -> RunResult<i64> {
        Ok(self.data.len() as i64)
    }

    fn repr(&self) -> RunResult<String> {
        Ok(repr_bytes(&self.data))
    }

    fn has_iter(&self) -> bool {
        true
    }

    fn has_len(&self) -> bool {
        true
    }
}

impl Object for ByteArray {
    fn type_info(&self) -> &'static TypeInfo {
        &BYTEARRAY_TYPE
    }

    fn add(&self, rhs: &Value) -> RunResult<Value> {
        let mut out = self.snapshot();
        out.extend_from_slice(&concat_operand(&BYTEARRAY_TYPE, rhs)?);
        Ok(ByteArray::value(out))
    }

    fn add_in_place(self: Rc<Self>, rhs: &Value) -> RunResult<Value> {
        let extra = concat_operand(&BYTEARRAY_TYPE, rhs)?;
        self.data.borrow_mut().extend_from_slice(&extra);
        Ok(self.into_value())
    }

    fn mul(&self, rhs: &Value) -> RunResult<Value> {
        let data = self.data.borrow();
        let n = repeat_count(rhs, data.len())?;
        Ok(ByteArray::value(data.repeat(n)))
    }

    fn lt(&self, rhs: &Value) -> RunResult<bool> {
        compare_bytes(&self.snapshot(), &BYTEARRAY_TYPE, rhs, CmpOp::Lt)
    }
    fn le(&self, rhs: &Value) -> RunResult<bool> {
        compare_bytes(&self.snapshot(), &BYTEARRAY_TYPE, rhs, CmpOp::Le)
    }
    fn gt(&self, rhs: &Value) -> RunResult<bool> {
        compare_bytes(&self.snapshot(), &BYTEARRAY_TYPE, rhs, CmpOp::Gt)
    }
    fn ge(&self, rhs: &Value) -> RunResult<bool> {
        compare_bytes(&self.snapshot(), &BYTEARRAY_TYPE, rhs, CmpOp::Ge)
    }

    fn get_item(&self, key: &Value) -> RunResult<Value> {
        let data = self.data.borrow();
        match seq_key(key, "bytearray")? {
            SeqKey::Index(i) => Ok(Value::int(data[normalize_index(i, data.len(), "bytearray")?] as i64)),
            SeqKey::Slice(s) => {
                let idx = s.indices(data.len())?;
                Ok(ByteArray::value(idx.positions().map(|p| data[p]).collect()))
            }
        }
    }

    fn set_item(&self, key: &Value, value: Value) -> RunResult<()> {
        match seq_key(key, "bytearray")? {
            SeqKey::Index(i) => {
                let byte = byte_of(&value, BYTE_RANGE)?;
                let mut data = self.data.borrow_mut();
                let pos = normalize_index(i, data.len(), "bytearray")?;
                data[pos] = byte;
                Ok(())
            }
            SeqKey::Slice(_) => Err(RunError::unsupported("slice assignment", BYTEARRAY_TYPE.name)),
        }
    }

    fn del_item(&self, key: &Value) -> RunResult<()> {
        match seq_key(key, "bytearray")? {
            SeqKey::Index(i) => {
                let mut data = self.data.borrow_mut();
                let pos = normalize_index(i, data.len(), "bytearray")?;
                data.remove(pos);
                Ok(())
            }
            SeqKey::Slice(_) => Err(RunError::unsupported("slice deletion", BYTEARRAY_TYPE.name)),
        }
    }

    fn get_attr(self: Rc<Self>, name: &str) -> RunResult<Value> {
        let kind = MethodKind::from_str(name);
        if crate::methods::bytes::supports_bytearray(kind) {
            return Ok(BoundMethod::value(self.into_value(), kind));
        }
        fallback_attr(&BYTEARRAY_TYPE, name)
    }

    fn iter(self: Rc<Self>) -> RunResult<Value> {
        Ok(Value::new(BytesIterator::new(&BYTEARRAY_ITERATOR_TYPE, Rc::from(self.snapshot()))))
    }

    fn bool_value(&self) -> RunResult<bool> {
        Ok(!self.data.borrow().is_empty())
    }

    fn contains(&self, item: &Value) -> RunResult<bool> {
        contains_in(&self.snapshot(), item)
    }

    fn equals(&self, rhs: &Value) -> RunResult<bool> {
        Ok(bytes_like(rhs).is_some_and(|other| *self.data.borrow() == other))
    }

    fn hash_code(&self) -> RunResult<i64> {
        Err(RunError::unhashable(BYTEARRAY_TYPE.name))
    }

    fn len(&self) -> RunResult<i64> {
        Ok(self.data.borrow().len() as i64)
    }

    fn repr(&self) -> RunResult<String> {
        Ok(format!("bytearray({})", repr_bytes(&self.data.borrow())))
    }

    fn has_iter(&self) -> bool {
        true
    }

    fn has_len(&self) -> bool {
        true
    }
}

fn bytes_source(fname: &str, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Vec<u8>> {
    allowed_kwargs(fname, kwargs, &["source", "encoding", "errors"])?;
    check_arity(fname, args, 0, 3)?;
    let source = args.first().cloned().or_else(|| kwarg(kwargs, "source"));
    let encoding = args.get(1).cloned().or_else(|| kwarg(kwargs, "encoding"));
    let Some(source) = source else {
        return Ok(Vec::new());
    };
    if let Some(s) = source.downcast_ref::<Str>() {
        let Some(encoding) = encoding else {
            return Err(RunError::type_error("string argument without an encoding"));
        };
        let encoding = encoding
            .as_str()
            .ok_or_else(|| RunError::type_error(format!("{fname}() argument 'encoding' must be str")))?
            .to_string();
        return encode(s.as_str(), &encoding);
    }
    if encoding.is_some() {
        return Err(RunError::type_error("encoding without a string argument"));
    }
    if let Some(n) = as_i64(&source) {
        if n < 0 {
            return Err(RunError::value_error("negative count"));
        }
        return Ok(vec![0u8; n as usize]);
    }
    if !source.has_iter() {
        return Err(RunError::type_error(format!(
            "cannot convert '{}' object to {fname}",
            source.type_name()
        )));
    }
    bytes_from_iterable(&source)
}

fn construct_bytes(_rt: &mut Runtime, _ty: &'static TypeInfo, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    Ok(Bytes::value(bytes_source("bytes", args, kwargs)?))
}

fn construct_bytearray(_rt: &mut Runtime, _ty: &'static TypeInfo, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    Ok(ByteArray::value(bytes_source("bytearray", args, kwargs)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exceptions::{OVERFLOW_ERROR_TYPE, TYPE_ERROR_TYPE, VALUE_ERROR_TYPE};

    #[test]
    fn oversized_repeat_raises_overflow() {
        let b = Bytes::value(b"ab".to_vec());
        assert_eq!(b.mul(&Value::int(2)).unwrap().repr().unwrap(), "b'abab'");
        assert!(b.mul(&Value::int(1 << 62)).unwrap_err().matches(&OVERFLOW_ERROR_TYPE));
        let ba = ByteArray::value(b"ab".to_vec());
        assert!(ba.mul(&Value::int(1 << 62)).unwrap_err().matches(&OVERFLOW_ERROR_TYPE));
    }

    #[test]
    fn bytes_behave_as_int_sequences() {
        let b = Bytes::value(b"ab\n".to_vec());
        assert_eq!(b.get_item(&Value::int(0)).unwrap().repr().unwrap(), "97");
        assert_eq!(b.repr().unwrap(), "b'ab\\n'");
        assert!(Value::int(98).is_in(&b).unwrap());
        assert!(Bytes::value(b"b\n".to_vec()).is_in(&b).unwrap());
        assert!(b.equals(&ByteArray::value(b"ab\n".to_vec())).unwrap());
    }

    #[test]
    fn bytearray_assignment_validates_range() {
        let ba = ByteArray::value(vec![1, 2, 3]);
        ba.set_item(&Value::int(-1), Value::int(255)).unwrap();
        assert_eq!(ba.repr().unwrap(), "bytearray(b'\\x01\\x02\\xff')");
        let err = ba.set_item(&Value::int(0), Value::int(256)).unwrap_err();
        assert!(err.matches(&VALUE_ERROR_TYPE));
        let err = ba.set_item(&Value::int(0), Value::new_str("x")).unwrap_err();
        assert!(err.matches(&TYPE_ERROR_TYPE));
        assert!(ba.hash_code().unwrap_err().matches(&TYPE_ERROR_TYPE));
    }

    #[test]
    fn bytearray_iteration_uses_a_snapshot() {
        let ba = ByteArray::value(vec![1, 2]);
        let it = ba.iter().unwrap();
        ba.set_item(&Value::int(0), Value::int(9)).unwrap();
        assert_eq!(it.next().unwrap().unwrap().repr().unwrap(), "1");
    }

    #[test]
    fn codecs() {
        assert_eq!(encode("é", "utf-8").unwrap(), vec![0xc3, 0xa9]);
        assert_eq!(decode(&[0xc3, 0xa9], "UTF8").unwrap(), "é");
        assert!(decode(&[0xff], "utf-8").unwrap_err().matches(&VALUE_ERROR_TYPE));
        assert!(encode("é", "ascii").is_err());
        assert_eq!(hex_string(&[0, 255]), "00ff");
    }
}
