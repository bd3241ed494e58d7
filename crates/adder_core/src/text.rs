//! Immutable string payload for script `str` values.
//!
//! Script strings are indexed and measured in code points. The count is taken
//! once at construction, which also tells whether the text is pure ASCII and
//! can be indexed by byte.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::Rc;

/// Longest UTF-8 payload stored without a heap allocation.
pub const INLINE_CAP: usize = 22;

#[derive(Clone)]
enum Storage {
    Inline { len: u8, bytes: [u8; INLINE_CAP] },
    Shared(Rc<str>),
}

#[derive(Clone)]
pub struct Text {
    storage: Storage,
    chars: usize,
}

impl Text {
    pub fn new() -> Self {
        Text { storage: Storage::Inline { len: 0, bytes: [0; INLINE_CAP] }, chars: 0 }
    }

    pub fn from_str(s: &str) -> Self {
        let chars = s.chars().count();
        if s.len() <= INLINE_CAP {
            return Self::inline(s, chars);
        }
        Text { storage: Storage::Shared(Rc::from(s)), chars }
    }

    pub fn from_string(s: String) -> Self {
        let chars = s.chars().count();
        if s.len() <= INLINE_CAP {
            return Self::inline(&s, chars);
        }
        Text { storage: Storage::Shared(Rc::from(s)), chars }
    }

    pub fn from_char(c: char) -> Self {
        let mut tmp = [0u8; 4];
        Self::inline(c.encode_utf8(&mut tmp), 1)
    }

    fn inline(s: &str, chars: usize) -> Self {
        let mut bytes = [0u8; INLINE_CAP];
        bytes[..s.len()].copy_from_slice(s.as_bytes());
        Text { storage: Storage::Inline { len: s.len() as u8, bytes }, chars }
    }

    pub fn as_str(&self) -> &str {
        match &self.storage {
            Storage::Inline { len, bytes } => {
                // SAFETY: inline bytes are only ever copied whole from a `&str`.
                unsafe { std::str::from_utf8_unchecked(&bytes[..*len as usize]) }
            }
            Storage::Shared(s) => s,
        }
    }

    /// True when the payload lives in the value itself.
    pub fn is_inline(&self) -> bool {
        matches!(self.storage, Storage::Inline { .. })
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars == 0
    }

    /// Length in code points.
    pub fn char_count(&self) -> usize {
        self.chars
    }

    pub fn is_ascii(&self) -> bool {
        self.chars == self.len()
    }

    pub fn char_at(&self, index: usize) -> Option<char> {
        if self.is_ascii() {
            return self.as_str().as_bytes().get(index).map(|&b| b as char);
        }
        self.as_str().chars().nth(index)
    }

    /// Byte offset of code point `index`; `index == char_count()` maps to the end.
    pub fn byte_offset(&self, index: usize) -> Option<usize> {
        if index > self.chars {
            return None;
        }
        if self.is_ascii() || index == self.chars {
            return Some(if index == self.chars { self.len() } else { index });
        }
        self.as_str().char_indices().nth(index).map(|(pos, _)| pos)
    }

    pub fn concat(&self, other: &Text) -> Text {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let chars = self.chars + other.chars;
        let total = self.len() + other.len();
        if total <= INLINE_CAP {
            let mut bytes = [0u8; INLINE_CAP];
            bytes[..self.len()].copy_from_slice(self.as_str().as_bytes());
            bytes[self.len()..total].copy_from_slice(other.as_str().as_bytes());
            return Text { storage: Storage::Inline { len: total as u8, bytes }, chars };
        }
        let mut out = String::with_capacity(total);
        out.push_str(self.as_str());
        out.push_str(other.as_str());
        Text { storage: Storage::Shared(Rc::from(out)), chars }
    }

    pub fn repeat(&self, count: usize) -> Text {
        match count {
            0 => Text::new(),
            1 => self.clone(),
            _ => Text::from_string(self.as_str().repeat(count)),
        }
    }
}

impl Default for Text {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        if let (Storage::Shared(a), Storage::Shared(b)) = (&self.storage, &other.storage) {
            if Rc::ptr_eq(a, b) {
                return true;
            }
        }
        self.chars == other.chars && self.as_str() == other.as_str()
    }
}

impl Eq for Text {}

impl PartialOrd for Text {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// UTF-8 byte order is code point order.
impl Ord for Text {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl Hash for Text {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Text::from_str(value)
    }
}

impl From<String> for Text {
    fn from(value: String) -> Self {
        Text::from_string(value)
    }
}

impl Deref for Text {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_code_points_not_bytes() {
        let t = Text::from_str("héllo");
        assert_eq!(t.len(), 6);
        assert_eq!(t.char_count(), 5);
        assert!(!t.is_ascii());
        assert_eq!(t.char_at(1), Some('é'));
        assert_eq!(t.char_at(5), None);
        assert_eq!(t.byte_offset(2), Some(3));
        assert_eq!(t.byte_offset(5), Some(6));
        assert_eq!(t.byte_offset(6), None);
    }

    #[test]
    fn concat_spills_to_the_heap() {
        let a = Text::from_str("0123456789");
        let joined = a.concat(&a);
        assert!(joined.is_inline());
        let longer = joined.concat(&a);
        assert!(!longer.is_inline());
        assert_eq!(longer.char_count(), 30);
        assert_eq!(longer.as_str(), "012345678901234567890123456789");
    }

    #[test]
    fn repeat_edges() {
        assert!(Text::from_str("ab").repeat(0).is_empty());
        assert_eq!(Text::from_str("ab").repeat(3).as_str(), "ababab");
        assert_eq!(Text::from_char('é').repeat(2).char_count(), 2);
    }
}
