//! 64-bit integers. Every operation that leaves the `i64` range raises
//! `OverflowError`.

use std::cmp::Ordering;

use adder_core::arith::{self, ArithError};
use adder_core::hash::hash_int;

use crate::Runtime;
use crate::builtins::common::{allowed_kwargs, check_arity, kwarg};
use crate::core::object::{Kwargs, Object, Value};
use crate::core::types::{OBJECT_TYPE, TypeInfo};
use crate::errors::{RunError, RunResult};
use crate::objects::bool::Bool;
use crate::objects::bytes::{ByteArray, Bytes};
use crate::objects::is_repeatable;
use crate::objects::str::Str;
use crate::util::format::format_int;
use crate::util::repr::repr_str;

pub static INT_TYPE: TypeInfo = TypeInfo::with_ctor("int", &OBJECT_TYPE, construct_int);

pub struct Int(pub i64);

const SMALL_INT_MIN: i64 = -5;
const SMALL_INT_MAX: i64 = 256;

thread_local! {
    static SMALL_INTS: Vec<Value> = (SMALL_INT_MIN..=SMALL_INT_MAX).map(|i| Value::new(Int(i))).collect();
}

impl Value {
    pub fn int(i: i64) -> Value {
        if (SMALL_INT_MIN..=SMALL_INT_MAX).contains(&i) {
            return SMALL_INTS.with(|cache| cache[(i - SMALL_INT_MIN) as usize].clone());
        }
        Value::new(Int(i))
    }
}

/// Integer payload of an `int` or `bool`.
pub fn as_i64(v: &Value) -> Option<i64> {
    if let Some(i) = v.downcast_ref::<Int>() {
        return Some(i.0);
    }
    v.downcast_ref::<Bool>().map(|b| b.0 as i64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IntOp {
    Add,
    Sub,
    Mul,
    FloorDiv,
    Mod,
    Pow,
    LShift,
    RShift,
    And,
    Or,
    Xor,
}

impl IntOp {
    pub(crate) fn symbol(self) -> &'static str {
        match self {
            IntOp::Add => "+",
            IntOp::Sub => "-",
            IntOp::Mul => "*",
            IntOp::FloorDiv => "//",
            IntOp::Mod => "%",
            IntOp::Pow => "** or pow()",
            IntOp::LShift => "<<",
            IntOp::RShift => ">>",
            IntOp::And => "&",
            IntOp::Or => "|",
            IntOp::Xor => "^",
        }
    }

    fn apply(self, a: i64, b: i64) -> Result<i64, ArithError> {
        match self {
            IntOp::Add => arith::add(a, b),
            IntOp::Sub => arith::sub(a, b),
            IntOp::Mul => arith::mul(a, b),
            IntOp::FloorDiv => arith::floor_div(a, b),
            IntOp::Mod => arith::floor_mod(a, b),
            IntOp::Pow => arith::pow(a, b),
            IntOp::LShift => arith::shl(a, b),
            IntOp::RShift => arith::shr(a, b),
            IntOp::And => Ok(a & b),
            IntOp::Or => Ok(a | b),
            IntOp::Xor => Ok(a ^ b),
        }
    }
}

pub(crate) fn int_binary(lhs: i64, lhs_type: &'static TypeInfo, op: IntOp, rhs: &Value) -> RunResult<Value> {
    match as_i64(rhs) {
        Some(b) => Ok(Value::int(op.apply(lhs, b)?)),
        None if op == IntOp::Mul && is_repeatable(rhs) => rhs.mul(&Value::int(lhs)),
        None => Err(RunError::operand_error(op.symbol(), lhs_type.name, rhs)),
    }
}

pub(crate) fn int_compare(lhs: i64, lhs_type: &'static TypeInfo, symbol: &str, rhs: &Value) -> RunResult<Ordering> {
    match as_i64(rhs) {
        Some(b) => Ok(lhs.cmp(&b)),
        None => Err(RunError::comparison_error(symbol, lhs_type.name, rhs)),
    }
}

impl Object for Int {
    fn type_info(&self) -> &'static TypeInfo {
        &INT_TYPE
    }

    fn invert(&self) -> RunResult<Value> {
        Ok(Value::int(!self.0))
    }

    fn pos(&self) -> RunResult<Value> {
        Ok(Value::int(self.0))
    }

    fn neg(&self) -> RunResult<Value> {
        Ok(Value::int(arith::neg(self.0)?))
    }

    fn abs(&self) -> RunResult<Value> {
        Ok(Value::int(arith::abs(self.0)?))
    }

    fn add(&self, rhs: &Value) -> RunResult<Value> {
        int_binary(self.0, &INT_TYPE, IntOp::Add, rhs)
    }
    fn and(&self, rhs: &Value) -> RunResult<Value> {
        int_binary(self.0, &INT_TYPE, IntOp::And, rhs)
    }
    fn floordiv(&self, rhs: &Value) -> RunResult<Value> {
        int_binary(self.0, &INT_TYPE, IntOp::FloorDiv, rhs)
    }
    fn lshift(&self, rhs: &Value) -> RunResult<Value> {
        int_binary(self.0, &INT_TYPE, IntOp::LShift, rhs)
    }
    fn modulo(&self, rhs: &Value) -> RunResult<Value> {
        int_binary(self.0, &INT_TYPE, IntOp::Mod, rhs)
    }
    fn mul(&self, rhs: &Value) -> RunResult<Value> {
        int_binary(self.0, &INT_TYPE, IntOp::Mul, rhs)
    }
    fn or(&self, rhs: &Value) -> RunResult<Value> {
        int_binary(self.0, &INT_TYPE, IntOp::Or, rhs)
    }
    fn pow(&self, rhs: &Value) -> RunResult<Value> {
        int_binary(self.0, &INT_TYPE, IntOp::Pow, rhs)
    }
    fn rshift(&self, rhs: &Value) -> RunResult<Value> {
        int_binary(self.0, &INT_TYPE, IntOp::RShift, rhs)
    }
    fn sub(&self, rhs: &Value) -> RunResult<Value> {
        int_binary(self.0, &INT_TYPE, IntOp::Sub, rhs)
    }
    fn xor(&self, rhs: &Value) -> RunResult<Value> {
        int_binary(self.0, &INT_TYPE, IntOp::Xor, rhs)
    }

    fn lt(&self, rhs: &Value) -> RunResult<bool> {
        Ok(int_compare(self.0, &INT_TYPE, "<", rhs)?.is_lt())
    }
    fn le(&self, rhs: &Value) -> RunResult<bool> {
        Ok(int_compare(self.0, &INT_TYPE, "<=", rhs)?.is_le())
    }
    fn gt(&self, rhs: &Value) -> RunResult<bool> {
        Ok(int_compare(self.0, &INT_TYPE, ">", rhs)?.is_gt())
    }
    fn ge(&self, rhs: &Value) -> RunResult<bool> {
        Ok(int_compare(self.0, &INT_TYPE, ">=", rhs)?.is_ge())
    }

    fn bool_value(&self) -> RunResult<bool> {
        Ok(self.0 != 0)
    }

    fn equals(&self, rhs: &Value) -> RunResult<bool> {
        Ok(as_i64(rhs) == Some(self.0))
    }

    fn hash_code(&self) -> RunResult<i64> {
        Ok(hash_int(self.0))
    }

    fn format(&self, spec: &str) -> RunResult<String> {
        format_int(self.0, spec)
    }

    fn index_value(&self) -> RunResult<i64> {
        Ok(self.0)
    }

    fn int_value(&self) -> RunResult<i64> {
        Ok(self.0)
    }

    fn repr(&self) -> RunResult<String> {
        let mut buf = itoa::Buffer::new();
        Ok(buf.format(self.0).to_string())
    }

    fn has_index(&self) -> bool {
        true
    }
}

/// Parses an integer literal the way `int(text, base)` does: surrounding
/// whitespace, an optional sign, an optional radix prefix, and single
/// underscores between digits.
pub fn parse_int(text: &str, base: u32) -> RunResult<i64> {
    let invalid = || RunError::value_error(format!("invalid literal for int() with base {base}: {}", repr_str(text)));

    let s = text.trim();
    let (negative, mut body) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let has_prefix = |body: &str, p: &str| body.len() >= 2 && body[..2].eq_ignore_ascii_case(p);
    let mut radix = base;
    let mut after_prefix = false;
    if base == 0 {
        radix = 10;
        for (p, r) in [("0x", 16), ("0o", 8), ("0b", 2)] {
            if has_prefix(body, p) {
                radix = r;
                body = &body[2..];
                after_prefix = true;
                break;
            }
        }
        // Base 0 rejects leading zeros in decimal literals other than zero itself.
        if radix == 10 && body.starts_with('0') && body.chars().any(|c| c != '0' && c != '_') {
            return Err(invalid());
        }
    } else {
        let prefix = match base {
            16 => Some("0x"),
            8 => Some("0o"),
            2 => Some("0b"),
            _ => None,
        };
        if let Some(p) = prefix {
            if has_prefix(body, p) {
                body = &body[2..];
                after_prefix = true;
            }
        }
    }

    let mut acc: i128 = 0;
    let mut overflow = false;
    let mut digits = 0usize;
    let mut prev_underscore = false;
    for (i, c) in body.chars().enumerate() {
        if c == '_' {
            if prev_underscore || (i == 0 && !after_prefix) {
                return Err(invalid());
            }
            prev_underscore = true;
            continue;
        }
        prev_underscore = false;
        let d = match c.to_digit(36) {
            Some(d) if d < radix => d,
            _ => return Err(invalid()),
        };
        digits += 1;
        if !overflow {
            acc = acc * radix as i128 + d as i128;
            if acc > i64::MAX as i128 + 1 {
                overflow = true;
            }
        }
    }
    if digits == 0 || prev_underscore {
        return Err(invalid());
    }
    let signed = if negative { -acc } else { acc };
    if overflow || signed > i64::MAX as i128 || signed < i64::MIN as i128 {
        return Err(RunError::overflow("int too large to convert"));
    }
    Ok(signed as i64)
}

fn int_from_value(v: &Value) -> RunResult<i64> {
    if let Some(i) = as_i64(v) {
        return Ok(i);
    }
    if let Some(s) = v.downcast_ref::<Str>() {
        return parse_int(s.as_str(), 10);
    }
    let raw = v
        .downcast_ref::<Bytes>()
        .map(|b| b.data().to_vec())
        .or_else(|| v.downcast_ref::<ByteArray>().map(|b| b.snapshot()));
    if let Some(raw) = raw {
        return parse_int(&String::from_utf8_lossy(&raw), 10);
    }
    Err(RunError::type_error(format!(
        "int() argument must be a string, a bytes-like object or a real number, not '{}'",
        v.type_name()
    )))
}

fn construct_int(_rt: &mut Runtime, _ty: &'static TypeInfo, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    allowed_kwargs("int", kwargs, &["base"])?;
    check_arity("int", args, 0, 2)?;
    let base = match (args.get(1), kwarg(kwargs, "base")) {
        (Some(_), Some(_)) => {
            return Err(RunError::type_error("argument for int() given by name ('base') and position (2)"));
        }
        (Some(b), None) => Some(b.clone()),
        (None, b) => b,
    };
    let Some(x) = args.first() else {
        return match base {
            None => Ok(Value::int(0)),
            Some(_) => Err(RunError::type_error("int() missing string argument")),
        };
    };
    let Some(base) = base else {
        return Ok(Value::int(int_from_value(x)?));
    };

    let base = as_i64(&base).ok_or_else(|| {
        RunError::type_error(format!("'{}' object cannot be interpreted as an integer", base.type_name()))
    })?;
    if base != 0 && !(2..=36).contains(&base) {
        return Err(RunError::value_error("int() base must be >= 2 and <= 36, or 0"));
    }
    if let Some(s) = x.downcast_ref::<Str>() {
        return Ok(Value::int(parse_int(s.as_str(), base as u32)?));
    }
    if let Some(b) = x.downcast_ref::<Bytes>() {
        return Ok(Value::int(parse_int(&String::from_utf8_lossy(b.data()), base as u32)?));
    }
    Err(RunError::type_error("int() can't convert non-string with explicit base"))
}
