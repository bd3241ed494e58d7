//! The polymorphic value handle and the capability trait every kind implements.
//!
//! A [`Value`] is a shared, reference-counted handle to some [`Object`]. Every
//! capability has a default that reports a coverage gap, so a kind only
//! overrides what it actually supports.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::Runtime;
use crate::core::types::TypeInfo;
use crate::errors::{RunError, RunResult};
use crate::objects::dict::Dict;

/// Keyword arguments are passed as a dict of `str` keys, or `None` when absent.
pub type Kwargs<'a> = Option<&'a Dict>;

/// Upcasting glue. Implemented for every sized `Object`.
pub trait AsAny: 'static {
    fn as_any(&self) -> &dyn Any;
    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any>;
    fn into_value(self: Rc<Self>) -> Value;
}

impl<T: Object> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }

    fn into_value(self: Rc<Self>) -> Value {
        Value(self)
    }
}

#[inline]
fn gap<T>(op: &str, ty: &'static TypeInfo) -> RunResult<T> {
    Err(RunError::unsupported(op, ty.name))
}

/// Address of an object, used for identity, identity hashes and default reprs.
#[inline]
pub fn address_of<T: ?Sized>(obj: &T) -> usize {
    obj as *const T as *const () as usize
}

/// Hash for kinds compared by identity.
#[inline]
pub fn identity_hash<T: ?Sized>(obj: &T) -> i64 {
    (address_of(obj) >> 4) as i64
}

/// `<kind object at 0x...>`
pub fn default_repr<T: ?Sized + Object>(obj: &T) -> String {
    format!("<{} object at {:#x}>", obj.type_info().name, address_of(obj))
}

/// Attribute lookup shared by every kind once its own attributes are exhausted.
pub fn fallback_attr(ty: &'static TypeInfo, name: &str) -> RunResult<Value> {
    if name == "__class__" {
        return Ok(ty.value());
    }
    Err(RunError::attribute_error(ty, name))
}

pub trait Object: AsAny {
    fn type_info(&self) -> &'static TypeInfo;

    // Unary operators.
    fn invert(&self) -> RunResult<Value> {
        gap("invert", self.type_info())
    }
    fn pos(&self) -> RunResult<Value> {
        gap("pos", self.type_info())
    }
    fn neg(&self) -> RunResult<Value> {
        gap("neg", self.type_info())
    }
    fn abs(&self) -> RunResult<Value> {
        gap("abs", self.type_info())
    }

    // Binary operators.
    fn add(&self, _rhs: &Value) -> RunResult<Value> {
        gap("add", self.type_info())
    }
    fn and(&self, _rhs: &Value) -> RunResult<Value> {
        gap("and", self.type_info())
    }
    fn floordiv(&self, _rhs: &Value) -> RunResult<Value> {
        gap("floordiv", self.type_info())
    }
    fn lshift(&self, _rhs: &Value) -> RunResult<Value> {
        gap("lshift", self.type_info())
    }
    fn matmul(&self, _rhs: &Value) -> RunResult<Value> {
        gap("matmul", self.type_info())
    }
    fn modulo(&self, _rhs: &Value) -> RunResult<Value> {
        gap("mod", self.type_info())
    }
    fn mul(&self, _rhs: &Value) -> RunResult<Value> {
        gap("mul", self.type_info())
    }
    fn or(&self, _rhs: &Value) -> RunResult<Value> {
        gap("or", self.type_info())
    }
    fn pow(&self, _rhs: &Value) -> RunResult<Value> {
        gap("pow", self.type_info())
    }
    fn rshift(&self, _rhs: &Value) -> RunResult<Value> {
        gap("rshift", self.type_info())
    }
    fn sub(&self, _rhs: &Value) -> RunResult<Value> {
        gap("sub", self.type_info())
    }
    fn truediv(&self, _rhs: &Value) -> RunResult<Value> {
        gap("truediv", self.type_info())
    }
    fn xor(&self, _rhs: &Value) -> RunResult<Value> {
        gap("xor", self.type_info())
    }

    // In-place operators fall back to the pure ones; mutable kinds override.
    fn add_in_place(self: Rc<Self>, rhs: &Value) -> RunResult<Value> {
        self.add(rhs)
    }
    fn and_in_place(self: Rc<Self>, rhs: &Value) -> RunResult<Value> {
        self.and(rhs)
    }
    fn floordiv_in_place(self: Rc<Self>, rhs: &Value) -> RunResult<Value> {
        self.floordiv(rhs)
    }
    fn lshift_in_place(self: Rc<Self>, rhs: &Value) -> RunResult<Value> {
        self.lshift(rhs)
    }
    fn matmul_in_place(self: Rc<Self>, rhs: &Value) -> RunResult<Value> {
        self.matmul(rhs)
    }
    fn modulo_in_place(self: Rc<Self>, rhs: &Value) -> RunResult<Value> {
        self.modulo(rhs)
    }
    fn mul_in_place(self: Rc<Self>, rhs: &Value) -> RunResult<Value> {
        self.mul(rhs)
    }
    fn or_in_place(self: Rc<Self>, rhs: &Value) -> RunResult<Value> {
        self.or(rhs)
    }
    fn pow_in_place(self: Rc<Self>, rhs: &Value) -> RunResult<Value> {
        self.pow(rhs)
    }
    fn rshift_in_place(self: Rc<Self>, rhs: &Value) -> RunResult<Value> {
        self.rshift(rhs)
    }
    fn sub_in_place(self: Rc<Self>, rhs: &Value) -> RunResult<Value> {
        self.sub(rhs)
    }
    fn truediv_in_place(self: Rc<Self>, rhs: &Value) -> RunResult<Value> {
        self.truediv(rhs)
    }
    fn xor_in_place(self: Rc<Self>, rhs: &Value) -> RunResult<Value> {
        self.xor(rhs)
    }

    // Ordering.
    fn lt(&self, _rhs: &Value) -> RunResult<bool> {
        gap("lt", self.type_info())
    }
    fn le(&self, _rhs: &Value) -> RunResult<bool> {
        gap("le", self.type_info())
    }
    fn gt(&self, _rhs: &Value) -> RunResult<bool> {
        gap("gt", self.type_info())
    }
    fn ge(&self, _rhs: &Value) -> RunResult<bool> {
        gap("ge", self.type_info())
    }

    // Subscription.
    fn get_item(&self, _key: &Value) -> RunResult<Value> {
        gap("get_item", self.type_info())
    }
    fn set_item(&self, _key: &Value, _value: Value) -> RunResult<()> {
        gap("set_item", self.type_info())
    }
    fn del_item(&self, _key: &Value) -> RunResult<()> {
        gap("del_item", self.type_info())
    }

    // Attributes.
    fn get_attr(self: Rc<Self>, name: &str) -> RunResult<Value> {
        fallback_attr(self.type_info(), name)
    }
    fn set_attr(&self, _name: &str, _value: Value) -> RunResult<()> {
        gap("set_attr", self.type_info())
    }
    fn del_attr(&self, _name: &str) -> RunResult<()> {
        gap("del_attr", self.type_info())
    }

    fn call(&self, _rt: &mut Runtime, _args: &[Value], _kwargs: Kwargs<'_>) -> RunResult<Value> {
        gap("call", self.type_info())
    }

    // Iteration.
    fn iter(self: Rc<Self>) -> RunResult<Value> {
        gap("iter", self.type_info())
    }
    /// `Ok(None)` signals exhaustion.
    fn next(&self) -> RunResult<Option<Value>> {
        gap("next", self.type_info())
    }

    // Context management.
    fn enter(self: Rc<Self>) -> RunResult<Value> {
        gap("enter", self.type_info())
    }
    fn exit(&self) -> RunResult<()> {
        gap("exit", self.type_info())
    }

    fn bool_value(&self) -> RunResult<bool>;

    fn contains(&self, _item: &Value) -> RunResult<bool> {
        gap("contains", self.type_info())
    }
    fn equals(&self, _rhs: &Value) -> RunResult<bool> {
        gap("equals", self.type_info())
    }
    fn hash_code(&self) -> RunResult<i64> {
        gap("hash_code", self.type_info())
    }
    fn format(&self, _spec: &str) -> RunResult<String> {
        gap("format", self.type_info())
    }
    fn index_value(&self) -> RunResult<i64> {
        gap("index_value", self.type_info())
    }
    fn int_value(&self) -> RunResult<i64> {
        gap("int_value", self.type_info())
    }
    fn len(&self) -> RunResult<i64> {
        gap("len", self.type_info())
    }
    fn repr(&self) -> RunResult<String>;
    fn str(&self) -> RunResult<String> {
        self.repr()
    }

    // Capability probes. These never fail.
    fn has_iter(&self) -> bool {
        false
    }
    fn has_index(&self) -> bool {
        false
    }
    fn has_len(&self) -> bool {
        false
    }
}

/// Shared handle to a runtime object.
#[derive(Clone)]
pub struct Value(Rc<dyn Object>);

impl Value {
    pub fn new<T: Object>(obj: T) -> Self {
        Value(Rc::new(obj))
    }

    pub fn from_rc<T: Object>(obj: Rc<T>) -> Self {
        Value(obj)
    }

    pub fn as_object(&self) -> &dyn Object {
        &*self.0
    }

    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn downcast_rc<T: Object>(&self) -> Option<Rc<T>> {
        self.0.clone().into_any_rc().downcast::<T>().ok()
    }

    pub fn addr(&self) -> usize {
        address_of(&*self.0)
    }

    /// Identity comparison (`is`).
    pub fn is(&self, other: &Value) -> bool {
        self.addr() == other.addr()
    }

    pub fn type_info(&self) -> &'static TypeInfo {
        self.0.type_info()
    }

    pub fn type_name(&self) -> &'static str {
        self.0.type_info().name
    }

    pub fn is_instance_of(&self, ty: &'static TypeInfo) -> bool {
        self.0.type_info().is_subtype_of(ty)
    }

    pub fn invert(&self) -> RunResult<Value> {
        self.0.invert()
    }
    pub fn pos(&self) -> RunResult<Value> {
        self.0.pos()
    }
    pub fn neg(&self) -> RunResult<Value> {
        self.0.neg()
    }
    pub fn abs(&self) -> RunResult<Value> {
        self.0.abs()
    }

    pub fn add(&self, rhs: &Value) -> RunResult<Value> {
        self.0.add(rhs)
    }
    pub fn and(&self, rhs: &Value) -> RunResult<Value> {
        self.0.and(rhs)
    }
    pub fn floordiv(&self, rhs: &Value) -> RunResult<Value> {
        self.0.floordiv(rhs)
    }
    pub fn lshift(&self, rhs: &Value) -> RunResult<Value> {
        self.0.lshift(rhs)
    }
    pub fn matmul(&self, rhs: &Value) -> RunResult<Value> {
        self.0.matmul(rhs)
    }
    pub fn modulo(&self, rhs: &Value) -> RunResult<Value> {
        self.0.modulo(rhs)
    }
    pub fn mul(&self, rhs: &Value) -> RunResult<Value> {
        self.0.mul(rhs)
    }
    pub fn or(&self, rhs: &Value) -> RunResult<Value> {
        self.0.or(rhs)
    }
    pub fn pow(&self, rhs: &Value) -> RunResult<Value> {
        self.0.pow(rhs)
    }
    pub fn rshift(&self, rhs: &Value) -> RunResult<Value> {
        self.0.rshift(rhs)
    }
    pub fn sub(&self, rhs: &Value) -> RunResult<Value> {
        self.0.sub(rhs)
    }
    pub fn truediv(&self, rhs: &Value) -> RunResult<Value> {
        self.0.truediv(rhs)
    }
    pub fn xor(&self, rhs: &Value) -> RunResult<Value> {
        self.0.xor(rhs)
    }

    pub fn add_in_place(&self, rhs: &Value) -> RunResult<Value> {
        self.0.clone().add_in_place(rhs)
    }
    pub fn and_in_place(&self, rhs: &Value) -> RunResult<Value> {
        self.0.clone().and_in_place(rhs)
    }
    pub fn floordiv_in_place(&self, rhs: &Value) -> RunResult<Value> {
        self.0.clone().floordiv_in_place(rhs)
    }
    pub fn lshift_in_place(&self, rhs: &Value) -> RunResult<Value> {
        self.0.clone().lshift_in_place(rhs)
    }
    pub fn matmul_in_place(&self, rhs: &Value) -> RunResult<Value> {
        self.0.clone().matmul_in_place(rhs)
    }
    pub fn modulo_in_place(&self, rhs: &Value) -> RunResult<Value> {
        self.0.clone().modulo_in_place(rhs)
    }
    pub fn mul_in_place(&self, rhs: &Value) -> RunResult<Value> {
        self.0.clone().mul_in_place(rhs)
    }
    pub fn or_in_place(&self, rhs: &Value) -> RunResult<Value> {
        self.0.clone().or_in_place(rhs)
    }
    pub fn pow_in_place(&self, rhs: &Value) -> RunResult<Value> {
        self.0.clone().pow_in_place(rhs)
    }
    pub fn rshift_in_place(&self, rhs: &Value) -> RunResult<Value> {
        self.0.clone().rshift_in_place(rhs)
    }
    pub fn sub_in_place(&self, rhs: &Value) -> RunResult<Value> {
        self.0.clone().sub_in_place(rhs)
    }
    pub fn truediv_in_place(&self, rhs: &Value) -> RunResult<Value> {
        self.0.clone().truediv_in_place(rhs)
    }
    pub fn xor_in_place(&self, rhs: &Value) -> RunResult<Value> {
        self.0.clone().xor_in_place(rhs)
    }

    pub fn lt(&self, rhs: &Value) -> RunResult<bool> {
        self.0.lt(rhs)
    }
    pub fn le(&self, rhs: &Value) -> RunResult<bool> {
        self.0.le(rhs)
    }
    pub fn gt(&self, rhs: &Value) -> RunResult<bool> {
        self.0.gt(rhs)
    }
    pub fn ge(&self, rhs: &Value) -> RunResult<bool> {
        self.0.ge(rhs)
    }
    pub fn equals(&self, rhs: &Value) -> RunResult<bool> {
        if self.is(rhs) {
            return Ok(true);
        }
        self.0.equals(rhs)
    }
    pub fn not_equals(&self, rhs: &Value) -> RunResult<bool> {
        Ok(!self.equals(rhs)?)
    }

    pub fn get_item(&self, key: &Value) -> RunResult<Value> {
        self.0.get_item(key)
    }
    pub fn set_item(&self, key: &Value, value: Value) -> RunResult<()> {
        self.0.set_item(key, value)
    }
    pub fn del_item(&self, key: &Value) -> RunResult<()> {
        self.0.del_item(key)
    }

    pub fn get_attr(&self, name: &str) -> RunResult<Value> {
        self.0.clone().get_attr(name)
    }
    pub fn set_attr(&self, name: &str, value: Value) -> RunResult<()> {
        self.0.set_attr(name, value)
    }
    pub fn del_attr(&self, name: &str) -> RunResult<()> {
        self.0.del_attr(name)
    }

    pub fn call(&self, rt: &mut Runtime, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
        self.0.call(rt, args, kwargs)
    }

    /// A fresh iterator, or `TypeError` for kinds that are not iterable.
    pub fn iter(&self) -> RunResult<Value> {
        if !self.0.has_iter() {
            return Err(RunError::type_error(format!("'{}' object is not iterable", self.type_name())));
        }
        self.0.clone().iter()
    }
    pub fn next(&self) -> RunResult<Option<Value>> {
        self.0.next()
    }

    /// Rust-side adapter over the iterator protocol.
    pub fn iterate(&self) -> RunResult<ValueIter> {
        Ok(ValueIter { iter: self.iter()? })
    }

    /// Drains an iterable into a vector.
    pub fn to_vec(&self) -> RunResult<Vec<Value>> {
        self.iterate()?.collect()
    }

    pub fn enter(&self) -> RunResult<Value> {
        self.0.clone().enter()
    }
    pub fn exit(&self) -> RunResult<()> {
        self.0.exit()
    }

    pub fn bool_value(&self) -> RunResult<bool> {
        self.0.bool_value()
    }
    pub fn contains(&self, item: &Value) -> RunResult<bool> {
        self.0.contains(item)
    }
    /// `self in container`, evaluated as `container.contains(self)`.
    pub fn is_in(&self, container: &Value) -> RunResult<bool> {
        container.contains(self)
    }
    pub fn hash_code(&self) -> RunResult<i64> {
        self.0.hash_code()
    }
    pub fn format(&self, spec: &str) -> RunResult<String> {
        self.0.format(spec)
    }
    pub fn index_value(&self) -> RunResult<i64> {
        self.0.index_value()
    }
    pub fn int_value(&self) -> RunResult<i64> {
        self.0.int_value()
    }
    pub fn len(&self) -> RunResult<i64> {
        self.0.len()
    }
    pub fn repr(&self) -> RunResult<String> {
        self.0.repr()
    }
    pub fn str(&self) -> RunResult<String> {
        self.0.str()
    }

    pub fn has_iter(&self) -> bool {
        self.0.has_iter()
    }
    pub fn has_index(&self) -> bool {
        self.0.has_index()
    }
    pub fn has_len(&self) -> bool {
        self.0.has_len()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.repr() {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "<{} object at {:#x}>", self.type_name(), self.addr()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.str() {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "<{} object at {:#x}>", self.type_name(), self.addr()),
        }
    }
}

pub struct ValueIter {
    iter: Value,
}

impl Iterator for ValueIter {
    type Item = RunResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.iter.next() {
            Ok(Some(v)) => Some(Ok(v)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
