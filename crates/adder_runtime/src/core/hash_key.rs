//! Keys for hash-based containers.

use std::hash::{Hash, Hasher};

use crate::core::object::Value;
use crate::errors::RunResult;

/// A value paired with its precomputed hash.
///
/// Equality goes through the value's `equals` capability. Mutating a value
/// after it was used as a key is not detected.
#[derive(Clone, Debug)]
pub struct HashKey {
    hash: i64,
    value: Value,
}

impl HashKey {
    /// Fails with `TypeError` when the value is unhashable.
    pub fn new(value: Value) -> RunResult<Self> {
        let hash = value.hash_code()?;
        Ok(Self { hash, value })
    }

    pub fn hash(&self) -> i64 {
        self.hash
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

impl PartialEq for HashKey {
    fn eq(&self, other: &Self) -> bool {
        if self.hash != other.hash {
            return false;
        }
        if self.value.is(&other.value) {
            return true;
        }
        // Hashable kinds compare without failing; a failure here is a bug in
        // one of them, so it is loud in debug builds and a miss otherwise.
        match self.value.equals(&other.value) {
            Ok(eq) => eq,
            Err(err) => {
                debug_assert!(false, "comparing hash keys failed: {err}");
                tracing::warn!(error = %err, "comparing hash keys failed");
                false
            }
        }
    }
}

impl Eq for HashKey {}

impl Hash for HashKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i64(self.hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{List, Tuple};

    fn key(v: Value) -> HashKey {
        HashKey::new(v).unwrap()
    }

    #[test]
    fn equal_values_make_equal_keys() {
        assert_eq!(key(Value::new_str("ab")), key(Value::new_string("a".to_string() + "b")));
        assert_eq!(key(Value::int(1)), key(Value::bool(true)));
        assert_ne!(key(Value::int(1)), key(Value::int(2)));
        let pair = || Tuple::value(vec![Value::int(1), Value::new_str("x")]);
        assert_eq!(key(pair()), key(pair()));
    }

    #[test]
    fn identical_values_skip_the_comparison() {
        let t = Tuple::value(vec![Value::none()]);
        assert_eq!(key(t.clone()), key(t));
    }

    #[test]
    fn unhashable_values_are_rejected() {
        assert!(HashKey::new(List::value(Vec::new())).is_err());
    }
}
