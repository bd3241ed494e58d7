//! Overflow-checked 64-bit integer kernels.
//!
//! Script integers are fixed-width: instead of promoting to a big integer every
//! operation that would leave the `i64` range reports [`ArithError::Overflow`].
//! Division and modulo floor toward negative infinity.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithError {
    #[error("integer overflow")]
    Overflow,
    #[error("integer division or modulo by zero")]
    ZeroDivision,
    #[error("negative shift count")]
    NegativeShift,
    #[error("negative exponent")]
    NegativeExponent,
}

pub type ArithResult = Result<i64, ArithError>;

#[inline]
pub fn add(a: i64, b: i64) -> ArithResult {
    a.checked_add(b).ok_or(ArithError::Overflow)
}

#[inline]
pub fn sub(a: i64, b: i64) -> ArithResult {
    a.checked_sub(b).ok_or(ArithError::Overflow)
}

#[inline]
pub fn mul(a: i64, b: i64) -> ArithResult {
    a.checked_mul(b).ok_or(ArithError::Overflow)
}

#[inline]
pub fn neg(a: i64) -> ArithResult {
    a.checked_neg().ok_or(ArithError::Overflow)
}

#[inline]
pub fn abs(a: i64) -> ArithResult {
    a.checked_abs().ok_or(ArithError::Overflow)
}

pub fn floor_div(a: i64, b: i64) -> ArithResult {
    if b == 0 {
        return Err(ArithError::ZeroDivision);
    }
    if a == i64::MIN && b == -1 {
        return Err(ArithError::Overflow);
    }
    let q = a / b;
    if (a % b != 0) && ((a < 0) != (b < 0)) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

/// Remainder carrying the sign of the divisor.
pub fn floor_mod(a: i64, b: i64) -> ArithResult {
    if b == 0 {
        return Err(ArithError::ZeroDivision);
    }
    if a == i64::MIN && b == -1 {
        return Err(ArithError::Overflow);
    }
    let r = a % b;
    if r != 0 && ((r < 0) != (b < 0)) {
        Ok(r + b)
    } else {
        Ok(r)
    }
}

pub fn shl(value: i64, count: i64) -> ArithResult {
    if count < 0 {
        return Err(ArithError::NegativeShift);
    }
    if value == 0 {
        return Ok(0);
    }
    if count >= 64 {
        return Err(ArithError::Overflow);
    }
    let shifted = value << count;
    if (shifted >> count) != value {
        return Err(ArithError::Overflow);
    }
    Ok(shifted)
}

pub fn shr(value: i64, count: i64) -> ArithResult {
    if count < 0 {
        return Err(ArithError::NegativeShift);
    }
    Ok(value >> count.min(63))
}

pub fn pow(base: i64, exp: i64) -> ArithResult {
    if exp < 0 {
        return Err(ArithError::NegativeExponent);
    }
    let mut result: i64 = 1;
    let mut base = base;
    let mut exp = exp as u64;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul(result, base)?;
        }
        exp >>= 1;
        if exp > 0 {
            base = match base.checked_mul(base) {
                Some(b) => b,
                // The squared base is only needed if more bits remain; any
                // remaining bit would multiply an overflowing factor in.
                None => return Err(ArithError::Overflow),
            };
        }
    }
    Ok(result)
}
