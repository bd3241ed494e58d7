//! Methods of the built-in kinds.
//!
//! Attribute lookup on a built-in value resolves the name to a [`MethodKind`]
//! and binds it to the receiver as a [`BoundMethod`]. Calling the bound
//! method dispatches on the receiver's kind.

use std::rc::Rc;

use crate::Runtime;
use crate::builtins::BUILTIN_FUNCTION_TYPE;
use crate::core::object::{Kwargs, Object, Value, identity_hash};
use crate::core::types::TypeInfo;
use crate::errors::{RunError, RunResult};
use crate::objects::bytes::{ByteArray, Bytes};
use crate::objects::dict::Dict;
use crate::objects::file::File;
use crate::objects::list::List;
use crate::objects::set::Set;
use crate::objects::str::Str;
use crate::objects::tuple::Tuple;

pub(crate) mod bytes;
pub(crate) mod common;
pub(crate) mod dict;
pub(crate) mod file;
pub(crate) mod list;
pub(crate) mod set;
pub(crate) mod str;
mod tuple;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum MethodKind {
    Append,
    Extend,
    Clear,
    Count,
    Index,
    Pop,
    Insert,
    Remove,
    Reverse,
    Sort,
    Copy,
    Join,
    Lower,
    Upper,
    Split,
    Strip,
    StartsWith,
    EndsWith,
    Replace,
    Find,
    Get,
    Keys,
    Values,
    Items,
    SetDefault,
    Update,
    Add,
    Discard,
    Decode,
    Hex,
    ReadLine,
    Read,
    Close,
    #[default]
    Unknown,
}

impl MethodKind {
    pub(crate) fn from_str(s: &str) -> Self {
        match s {
            "append" => Self::Append,
            "extend" => Self::Extend,
            "clear" => Self::Clear,
            "count" => Self::Count,
            "index" => Self::Index,
            "pop" => Self::Pop,
            "insert" => Self::Insert,
            "remove" => Self::Remove,
            "reverse" => Self::Reverse,
            "sort" => Self::Sort,
            "copy" => Self::Copy,
            "join" => Self::Join,
            "lower" => Self::Lower,
            "upper" => Self::Upper,
            "split" => Self::Split,
            "strip" => Self::Strip,
            "startswith" => Self::StartsWith,
            "endswith" => Self::EndsWith,
            "replace" => Self::Replace,
            "find" => Self::Find,
            "get" => Self::Get,
            "keys" => Self::Keys,
            "values" => Self::Values,
            "items" => Self::Items,
            "setdefault" => Self::SetDefault,
            "update" => Self::Update,
            "add" => Self::Add,
            "discard" => Self::Discard,
            "decode" => Self::Decode,
            "hex" => Self::Hex,
            "readline" => Self::ReadLine,
            "read" => Self::Read,
            "close" => Self::Close,
            _ => Self::Unknown,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::Extend => "extend",
            Self::Clear => "clear",
            Self::Count => "count",
            Self::Index => "index",
            Self::Pop => "pop",
            Self::Insert => "insert",
            Self::Remove => "remove",
            Self::Reverse => "reverse",
            Self::Sort => "sort",
            Self::Copy => "copy",
            Self::Join => "join",
            Self::Lower => "lower",
            Self::Upper => "upper",
            Self::Split => "split",
            Self::Strip => "strip",
            Self::StartsWith => "startswith",
            Self::EndsWith => "endswith",
            Self::Replace => "replace",
            Self::Find => "find",
            Self::Get => "get",
            Self::Keys => "keys",
            Self::Values => "values",
            Self::Items => "items",
            Self::SetDefault => "setdefault",
            Self::Update => "update",
            Self::Add => "add",
            Self::Discard => "discard",
            Self::Decode => "decode",
            Self::Hex => "hex",
            Self::ReadLine => "readline",
            Self::Read => "read",
            Self::Close => "close",
            Self::Unknown => "<unknown>",
        }
    }
}

pub(crate) fn dispatch_builtin_method(
    rt: &mut Runtime,
    recv: &Value,
    kind: MethodKind,
    args: &[Value],
    kwargs: Kwargs<'_>,
) -> RunResult<Value> {
    if let Some(s) = recv.downcast_ref::<Str>() {
        return str::dispatch(s, kind, args, kwargs);
    }
    if let Some(l) = recv.downcast_rc::<List>() {
        return list::dispatch(rt, &l, kind, args, kwargs);
    }
    if let Some(d) = recv.downcast_rc::<Dict>() {
        return dict::dispatch(&d, kind, args, kwargs);
    }
    if let Some(s) = recv.downcast_ref::<Set>() {
        return set::dispatch(s, kind, args, kwargs);
    }
    if let Some(t) = recv.downcast_ref::<Tuple>() {
        return tuple::dispatch(t, kind, args, kwargs);
    }
    if let Some(b) = recv.downcast_ref::<Bytes>() {
        return bytes::dispatch_bytes(b, kind, args, kwargs);
    }
    if let Some(b) = recv.downcast_ref::<ByteArray>() {
        return bytes::dispatch_bytearray(b, kind, args, kwargs);
    }
    if let Some(f) = recv.downcast_ref::<File>() {
        return file::dispatch(f, kind, args, kwargs);
    }
    Err(RunError::unsupported(kind.name(), recv.type_name()))
}

/// A method of a built-in kind bound to its receiver.
pub struct BoundMethod {
    recv: Value,
    kind: MethodKind,
}

impl BoundMethod {
    pub(crate) fn value(recv: Value, kind: MethodKind) -> Value {
        Value::from_rc(Rc::new(BoundMethod { recv, kind }))
    }

    pub fn receiver(&self) -> &Value {
        &self.recv
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

impl Object for BoundMethod {
    fn type_info(&self) -> &'static TypeInfo {
        &BUILTIN_FUNCTION_TYPE
    }

    fn call(&self, rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
        dispatch_builtin_method(rt, &self.recv, self.kind, args, kwargs)
    }

    fn bool_value(&self) -> RunResult<bool> {
        Ok(true)
    }

    fn equals(&self, rhs: &Value) -> RunResult<bool> {
        match rhs.downcast_ref::<BoundMethod>() {
            Some(other) => Ok(self.kind == other.kind && self.recv.is(&other.recv)),
            None => Ok(false),
        }
    }

    fn hash_code(&self) -> RunResult<i64> {
        Ok(identity_hash(self) ^ self.recv.addr() as i64)
    }

    fn repr(&self) -> RunResult<String> {
        Ok(format!(
            "<built-in method {} of {} object at {:#x}>",
            self.kind.name(),
            self.recv.type_name(),
            self.recv.addr()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exceptions::ATTRIBUTE_ERROR_TYPE;

    #[test]
    fn names_round_trip() {
        for name in ["append", "setdefault", "startswith", "readline", "hex"] {
            assert_eq!(MethodKind::from_str(name).name(), name);
        }
        assert_eq!(MethodKind::from_str("nope"), MethodKind::Unknown);
    }

    #[test]
    fn bound_methods_remember_the_receiver() {
        let mut rt = Runtime::new();
        let l = List::value(Vec::new());
        let append = l.get_attr("append").unwrap();
        assert!(append.repr().unwrap().starts_with("<built-in method append of list object at 0x"));
        append.call(&mut rt, &[Value::int(1)], None).unwrap();
        assert_eq!(l.repr().unwrap(), "[1]");
        assert!(l.get_attr("upper").unwrap_err().matches(&ATTRIBUTE_ERROR_TYPE));
        let err = l.get_attr("nope").unwrap_err();
        assert_eq!(err.to_string(), "AttributeError: 'list' object has no attribute 'nope'");
    }
}
