//! `%`-style string interpolation and the narrow format-spec mini language.
//!
//! Only the subset generated code relies on is implemented; everything else
//! is reported as a coverage gap rather than guessed at.

use crate::core::object::Value;
use crate::errors::messages::{INCOMPLETE_FORMAT, NOT_ENOUGH_FORMAT_ARGS, TOO_MANY_FORMAT_ARGS};
use crate::errors::{RunError, RunResult};
use crate::objects::int::as_i64;
use crate::objects::tuple::Tuple;

fn pad_left(body: &str, width: usize, fill: char) -> String {
    let n = body.chars().count();
    if n >= width {
        return body.to_string();
    }
    let mut out = String::with_capacity(width);
    out.extend(std::iter::repeat_n(fill, width - n));
    out.push_str(body);
    out
}

/// Right-aligns a number; zero padding goes between the sign and the digits.
fn pad_number(negative: bool, digits: &str, width: usize, zero: bool) -> String {
    let sign = if negative { "-" } else { "" };
    if zero {
        let inner = width.saturating_sub(sign.len());
        format!("{sign}{}", pad_left(digits, inner, '0'))
    } else {
        pad_left(&format!("{sign}{digits}"), width, ' ')
    }
}

fn radix_digits(v: i64, radix: char) -> String {
    let mag = v.unsigned_abs();
    match radix {
        'x' => format!("{mag:x}"),
        'X' => format!("{mag:X}"),
        'o' => format!("{mag:o}"),
        'b' => format!("{mag:b}"),
        _ => {
            let mut buf = itoa::Buffer::new();
            buf.format(mag).to_string()
        }
    }
}

/// `fmt % args`
pub fn percent_format(fmt: &str, args: &Value) -> RunResult<String> {
    let items: Vec<Value> = match args.downcast_ref::<Tuple>() {
        Some(t) => t.items().to_vec(),
        None => vec![args.clone()],
    };
    let mut next_arg = items.iter();
    let mut out = String::with_capacity(fmt.len());
    let mut chars = fmt.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let mut zero = false;
        let mut width = 0usize;
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }
        if chars.peek() == Some(&'0') {
            zero = true;
            chars.next();
        }
        if let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
            width = d as usize;
            chars.next();
            if chars.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(RunError::unsupported("multi-digit width in % format", "str"));
            }
        }
        let Some(conv) = chars.next() else {
            return Err(RunError::value_error(INCOMPLETE_FORMAT));
        };
        if !matches!(conv, 's' | 'r' | 'd' | 'x' | 'X') {
            return Err(RunError::unsupported(&format!("%{conv} conversion"), "str"));
        }
        let Some(arg) = next_arg.next() else {
            return Err(RunError::type_error(NOT_ENOUGH_FORMAT_ARGS));
        };
        let piece = match conv {
            's' => pad_left(&arg.str()?, width, ' '),
            'r' => pad_left(&arg.repr()?, width, ' '),
            'd' => {
                let v = as_i64(arg).ok_or_else(|| {
                    RunError::type_error(format!("%d format: a real number is required, not {}", arg.type_name()))
                })?;
                pad_number(v < 0, &radix_digits(v, 'd'), width, zero)
            }
            _ => {
                let v = as_i64(arg).ok_or_else(|| {
                    RunError::type_error(format!("%{conv} format: an integer is required, not {}", arg.type_name()))
                })?;
                pad_number(v < 0, &radix_digits(v, conv), width, zero)
            }
        };
        out.push_str(&piece);
    }

    if next_arg.next().is_some() {
        return Err(RunError::type_error(TOO_MANY_FORMAT_ARGS));
    }
    Ok(out)
}

/// `[0][width-digit][type]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    pub zero: bool,
    pub width: usize,
    pub ty: Option<char>,
}

pub fn parse_spec(spec: &str, type_name: &str) -> RunResult<FormatSpec> {
    let mut chars = spec.chars().peekable();
    let mut parsed = FormatSpec { zero: false, width: 0, ty: None };
    if chars.peek() == Some(&'0') {
        parsed.zero = true;
        chars.next();
    }
    if let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        parsed.width = d as usize;
        chars.next();
    }
    if let Some(&c) = chars.peek() {
        if c.is_ascii_alphabetic() {
            parsed.ty = Some(c);
            chars.next();
        }
    }
    if chars.next().is_some() {
        return Err(RunError::unsupported(&format!("format spec '{spec}'"), type_name));
    }
    Ok(parsed)
}

pub fn format_int(v: i64, spec: &str) -> RunResult<String> {
    let parsed = parse_spec(spec, "int")?;
    let radix = match parsed.ty {
        None => 'd',
        Some(c @ ('d' | 'x' | 'X' | 'o' | 'b')) => c,
        Some(c) => return Err(RunError::unsupported(&format!("format code '{c}'"), "int")),
    };
    Ok(pad_number(v < 0, &radix_digits(v, radix), parsed.width, parsed.zero))
}

pub fn format_str(s: &str, spec: &str) -> RunResult<String> {
    if spec.is_empty() {
        return Ok(s.to_string());
    }
    let parsed = parse_spec(spec, "str")?;
    if parsed.zero || !matches!(parsed.ty, None | Some('s')) {
        return Err(RunError::unsupported(&format!("format spec '{spec}'"), "str"));
    }
    let n = s.chars().count();
    let mut out = s.to_string();
    if n < parsed.width {
        out.extend(std::iter::repeat_n(' ', parsed.width - n));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exceptions::TYPE_ERROR_TYPE;

    #[test]
    fn percent_conversions() {
        let args = Tuple::value(vec![Value::new_str("a"), Value::new_str("b"), Value::int(-5), Value::int(255)]);
        assert_eq!(percent_format("%s %r %03d %X%%", &args).unwrap(), "a 'b' -05 FF%");
        assert_eq!(percent_format("[%4s]", &Value::new_str("ab")).unwrap(), "[  ab]");
        assert_eq!(percent_format("%x", &Value::int(-255)).unwrap(), "-ff");
        assert_eq!(percent_format("%d", &Value::bool(true)).unwrap(), "1");
    }

    #[test]
    fn percent_arity_errors() {
        let err = percent_format("%s %s", &Value::new_str("a")).unwrap_err();
        assert!(err.matches(&TYPE_ERROR_TYPE));
        let err = percent_format("%s", &Tuple::value(vec![Value::int(1), Value::int(2)])).unwrap_err();
        assert!(err.matches(&TYPE_ERROR_TYPE));
        let err = percent_format("%d", &Value::new_str("x")).unwrap_err();
        assert!(err.matches(&TYPE_ERROR_TYPE));
    }

    #[test]
    fn percent_gaps() {
        assert!(percent_format("%f", &Value::int(1)).unwrap_err().is_unsupported());
        assert!(percent_format("%10d", &Value::int(1)).unwrap_err().is_unsupported());
    }

    #[test]
    fn spec_formatting() {
        assert_eq!(format_int(42, "").unwrap(), "42");
        assert_eq!(format_int(42, "05d").unwrap(), "00042");
        assert_eq!(format_int(-42, "05").unwrap(), "-0042");
        assert_eq!(format_int(255, "x").unwrap(), "ff");
        assert_eq!(format_int(5, "b").unwrap(), "101");
        assert_eq!(format_str("ab", "4").unwrap(), "ab  ");
        assert!(format_int(1, ">5").unwrap_err().is_unsupported());
        assert!(format_int(1, "f").unwrap_err().is_unsupported());
        assert!(format_str("a", "10").unwrap_err().is_unsupported());
    }
}
