use crate::builtins::common::{allowed_kwargs, arg_or_kwarg, check_arity, str_arg};
use crate::core::object::{Kwargs, Value};
use crate::errors::messages::BYTE_RANGE;
use crate::errors::{RunError, RunResult};
use crate::objects::bytes::{BYTEARRAY_TYPE, BYTES_TYPE, ByteArray, Bytes, byte_of, decode, hex_string};

use super::MethodKind;
use super::common::arity;

pub(crate) fn supports_bytes(kind: MethodKind) -> bool {
    matches!(kind, MethodKind::Decode | MethodKind::Hex)
}

pub(crate) fn supports_bytearray(kind: MethodKind) -> bool {
    supports_bytes(kind) || matches!(kind, MethodKind::Append | MethodKind::Extend | MethodKind::Clear)
}

/// `decode(encoding='utf-8', errors='strict')`; only strict decoding exists.
fn decode_call(raw: &[u8], args: &[Value], kwargs: Kwargs<'_>, type_name: &str) -> RunResult<Value> {
    allowed_kwargs("decode", kwargs, &["encoding", "errors"])?;
    check_arity("decode", args, 0, 2)?;
    let encoding = match arg_or_kwarg(args, 0, kwargs, "encoding") {
        Some(v) => str_arg("decode", 0, &v)?,
        None => "utf-8".to_string(),
    };
    if let Some(errors) = arg_or_kwarg(args, 1, kwargs, "errors") {
        if str_arg("decode", 1, &errors)? != "strict" {
            return Err(RunError::unsupported("decode with a non-strict error handler", type_name));
        }
    }
    Ok(Value::new_string(decode(raw, &encoding)?))
}

pub(super) fn dispatch_bytes(b: &Bytes, kind: MethodKind, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    match kind {
        MethodKind::Decode => decode_call(b.data(), args, kwargs, BYTES_TYPE.name),
        MethodKind::Hex => {
            arity(kind, args, kwargs, 0, 0)?;
            Ok(Value::new_string(hex_string(b.data())))
        }
        _ => Err(RunError::unsupported(kind.name(), BYTES_TYPE.name)),
    }
}

pub(super) fn dispatch_bytearray(b: &ByteArray, kind: MethodKind, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    match kind {
        MethodKind::Decode => decode_call(&b.snapshot(), args, kwargs, BYTEARRAY_TYPE.name),
        MethodKind::Hex => {
            arity(kind, args, kwargs, 0, 0)?;
            Ok(Value::new_string(hex_string(&b.snapshot())))
        }
        MethodKind::Append => {
            arity(kind, args, kwargs, 1, 1)?;
            b.push(byte_of(&args[0], BYTE_RANGE)?);
            Ok(Value::none())
        }
        MethodKind::Extend => {
            arity(kind, args, kwargs, 1, 1)?;
            b.extend_from(&args[0])?;
            Ok(Value::none())
        }
        MethodKind::Clear => {
            arity(kind, args, kwargs, 0, 0)?;
            b.clear();
            Ok(Value::none())
        }
        _ => Err(RunError::unsupported(kind.name(), BYTEARRAY_TYPE.name)),
    }
}

#[cfg(test)]
mod tests {
    use crate::Runtime;
    use crate::core::exceptions::{LOOKUP_ERROR_TYPE, VALUE_ERROR_TYPE};
    use crate::core::object::Value;
    use crate::errors::RunResult;
    use crate::objects::bytes::{ByteArray, Bytes};

    fn call(recv: &Value, name: &str, args: &[Value]) -> RunResult<Value> {
        let mut rt = Runtime::new();
        recv.get_attr(name)?.call(&mut rt, args, None)
    }

    #[test]
    fn decode_and_hex() {
        let b = Bytes::value("hé".as_bytes().to_vec());
        assert_eq!(call(&b, "decode", &[]).unwrap().repr().unwrap(), "'hé'");
        assert_eq!(call(&b, "hex", &[]).unwrap().repr().unwrap(), "'68c3a9'");
        let err = call(&b, "decode", &[Value::new_str("ascii")]).unwrap_err();
        assert!(err.matches(&VALUE_ERROR_TYPE));
        let err = call(&b, "decode", &[Value::new_str("klingon")]).unwrap_err();
        assert!(err.matches(&LOOKUP_ERROR_TYPE));
        assert!(call(&b, "append", &[Value::int(1)]).is_err());
    }

    #[test]
    fn bytearray_grows_in_place() {
        let b = ByteArray::value(b"a".to_vec());
        call(&b, "append", &[Value::int(98)]).unwrap();
        call(&b, "extend", &[ByteArray::value(b"cd".to_vec())]).unwrap();
        assert_eq!(b.repr().unwrap(), "bytearray(b'abcd')");
        let err = call(&b, "append", &[Value::int(256)]).unwrap_err();
        assert_eq!(err.to_string(), "ValueError: byte must be in range(0, 256)");
        call(&b, "clear", &[]).unwrap();
        assert_eq!(b.len().unwrap(), 0);
    }
}
