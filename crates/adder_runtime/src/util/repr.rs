//! Literal rendering for `repr()` of text and byte kinds, plus recursion
//! guarding for self-referencing containers.

use std::cell::RefCell;

use crate::errors::RunResult;

fn pick_quote(has_single: bool, has_double: bool) -> char {
    if has_single && !has_double { '"' } else { '\'' }
}

fn needs_hex_escape(c: char) -> bool {
    let cp = c as u32;
    cp < 0x20 || (0x7F..=0xA0).contains(&cp) || cp == 0xAD
}

/// Quoted string literal, e.g. `'a\n'` or `"it's"`.
pub fn repr_str(s: &str) -> String {
    let quote = pick_quote(s.contains('\''), s.contains('"'));
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if needs_hex_escape(c) => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Byte literal body with `b` prefix, e.g. `b'\x00ab'`.
pub fn repr_bytes(b: &[u8]) -> String {
    let quote = pick_quote(b.contains(&b'\''), b.contains(&b'"'));
    let mut out = String::with_capacity(b.len() + 3);
    out.push('b');
    out.push(quote);
    for &byte in b {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            c if c as char == quote => {
                out.push('\\');
                out.push(quote);
            }
            c if !(0x20..0x7F).contains(&c) => out.push_str(&format!("\\x{:02x}", c)),
            c => out.push(c as char),
        }
    }
    out.push(quote);
    out
}

thread_local! {
    static REPR_STACK: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Renders a container, substituting `placeholder` if it is already being
/// rendered further up the stack.
pub fn guarded(addr: usize, placeholder: &str, render: impl FnOnce() -> RunResult<String>) -> RunResult<String> {
    let reentered = REPR_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        if stack.contains(&addr) {
            true
        } else {
            stack.push(addr);
            false
        }
    });
    if reentered {
        return Ok(placeholder.to_string());
    }
    let result = render();
    REPR_STACK.with(|stack| {
        stack.borrow_mut().pop();
    });
    result
}
