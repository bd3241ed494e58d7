//! Type descriptors, type objects and the subtype relation.
//!
//! Every concrete kind owns one `static TypeInfo`. Base links form a single
//! inheritance chain that always ends at `object`. A descriptor is surfaced to
//! scripts as a [`TypeObject`], interned per thread so that `type(1) is int`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use adder_core::hash::{FastHashMap, fast_map_new};

use crate::Runtime;
use crate::core::object::{Kwargs, Object, Value, address_of, default_repr, fallback_attr, identity_hash};
use crate::errors::{RunError, RunResult};
use crate::objects::tuple::Tuple;

/// Builds an instance of the given type from call arguments.
pub type Constructor = fn(&mut Runtime, &'static TypeInfo, &[Value], Kwargs<'_>) -> RunResult<Value>;

pub struct TypeInfo {
    pub name: &'static str,
    pub base: Option<&'static TypeInfo>,
    pub ctor: Option<Constructor>,
}

impl TypeInfo {
    pub const fn new(name: &'static str, base: &'static TypeInfo) -> Self {
        Self { name, base: Some(base), ctor: None }
    }

    pub const fn with_ctor(name: &'static str, base: &'static TypeInfo, ctor: Constructor) -> Self {
        Self { name, base: Some(base), ctor: Some(ctor) }
    }

    pub fn is(&self, other: &TypeInfo) -> bool {
        std::ptr::eq(self, other)
    }

    /// True when `self` is `ty` or inherits from it.
    pub fn is_subtype_of(&self, ty: &TypeInfo) -> bool {
        let mut cur: Option<&TypeInfo> = Some(self);
        while let Some(t) = cur {
            if t.is(ty) {
                return true;
            }
            cur = t.base;
        }
        false
    }

    /// The interned type object for this descriptor.
    pub fn value(&'static self) -> Value {
        thread_local! {
            static TYPE_OBJECTS: RefCell<FastHashMap<usize, Value>> = RefCell::new(fast_map_new());
        }
        let key = address_of(self);
        TYPE_OBJECTS.with(|cache| {
            cache
                .borrow_mut()
                .entry(key)
                .or_insert_with(|| Value::from_rc(Rc::new(TypeObject { info: self })))
                .clone()
        })
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo").field("name", &self.name).finish()
    }
}

pub static OBJECT_TYPE: TypeInfo = TypeInfo { name: "object", base: None, ctor: Some(construct_object) };
pub static TYPE_TYPE: TypeInfo = TypeInfo::with_ctor("type", &OBJECT_TYPE, construct_type);

/// A type descriptor exposed as a value.
pub struct TypeObject {
    pub info: &'static TypeInfo,
}

impl Object for TypeObject {
    fn type_info(&self) -> &'static TypeInfo {
        &TYPE_TYPE
    }

    fn get_attr(self: Rc<Self>, name: &str) -> RunResult<Value> {
        match name {
            "__name__" => Ok(Value::new_str(self.info.name)),
            "__base__" => Ok(self.info.base.map(TypeInfo::value).unwrap_or_else(Value::none)),
            _ => fallback_attr(self.type_info(), name),
        }
    }

    fn call(&self, rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
        match self.info.ctor {
            Some(ctor) => ctor(rt, self.info, args, kwargs),
            None => Err(RunError::type_error(format!("cannot create '{}' instances", self.info.name))),
        }
    }

    fn bool_value(&self) -> RunResult<bool> {
        Ok(true)
    }

    fn equals(&self, rhs: &Value) -> RunResult<bool> {
        Ok(rhs.downcast_ref::<TypeObject>().is_some_and(|t| t.info.is(self.info)))
    }

    fn hash_code(&self) -> RunResult<i64> {
        Ok((address_of(self.info) >> 4) as i64)
    }

    fn repr(&self) -> RunResult<String> {
        Ok(format!("<class '{}'>", self.info.name))
    }
}

/// Instance created by calling `object()`.
pub struct PlainObject;

impl Object for PlainObject {
    fn type_info(&self) -> &'static TypeInfo {
        &OBJECT_TYPE
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
}

fn construct_object(_rt: &mut Runtime, _ty: &'static TypeInfo, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    if !args.is_empty() || kwargs.is_some_and(|k| k.size() > 0) {
        return Err(RunError::type_error("object() takes no arguments"));
    }
    Ok(Value::new(PlainObject))
}

fn construct_type(_rt: &mut Runtime, _ty: &'static TypeInfo, args: &[Value], _kwargs: Kwargs<'_>) -> RunResult<Value> {
    match args {
        [obj] => Ok(obj.type_info().value()),
        [_, _, _] => Err(RunError::unsupported("type() with three arguments", TYPE_TYPE.name)),
        _ => Err(RunError::type_error("type() takes 1 or 3 arguments")),
    }
}

fn match_classinfo(ty: &'static TypeInfo, classinfo: &Value, fname: &str) -> RunResult<bool> {
    if let Some(t) = classinfo.downcast_ref::<TypeObject>() {
        return Ok(ty.is_subtype_of(t.info));
    }
    if let Some(tuple) = classinfo.downcast_ref::<Tuple>() {
        for candidate in tuple.items() {
            if match_classinfo(ty, candidate, fname)? {
                return Ok(true);
            }
        }
        return Ok(false);
    }
    Err(RunError::type_error(format!(
        "{fname}() arg 2 must be a type, a tuple of types, or a union"
    )))
}

/// `isinstance(obj, classinfo)` where `classinfo` is a type or a (nested) tuple of types.
pub fn isinstance(obj: &Value, classinfo: &Value) -> RunResult<bool> {
    match_classinfo(obj.type_info(), classinfo, "isinstance")
}

/// `issubclass(cls, classinfo)`
pub fn issubclass(cls: &Value, classinfo: &Value) -> RunResult<bool> {
    let Some(t) = cls.downcast_ref::<TypeObject>() else {
        return Err(RunError::type_error("issubclass() arg 1 must be a class"));
    };
    match_classinfo(t.info, classinfo, "issubclass")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::bool::BOOL_TYPE;
    use crate::objects::int::INT_TYPE;

    #[test]
    fn chains_end_at_object() {
        assert!(BOOL_TYPE.is_subtype_of(&INT_TYPE));
        assert!(BOOL_TYPE.is_subtype_of(&OBJECT_TYPE));
        assert!(!INT_TYPE.is_subtype_of(&BOOL_TYPE));
        assert!(TYPE_TYPE.is_subtype_of(&OBJECT_TYPE));
    }

    #[test]
    fn type_objects_are_interned() {
        assert!(INT_TYPE.value().is(&INT_TYPE.value()));
        assert!(!INT_TYPE.value().is(&BOOL_TYPE.value()));
        let ty = TYPE_TYPE.value();
        assert!(ty.type_info().value().is(&ty));
    }
}
