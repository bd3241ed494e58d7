//! Leaf types for the adder runtime.
//!
//! This crate contains the pieces that do not depend on the object model:
//! - `Text` - Immutable string with small string optimization
//! - `hash` - Deterministic hashing helpers and hash map aliases
//! - `arith` - Overflow-checked integer kernels with floor semantics

pub mod arith;
pub mod hash;
pub mod text;

pub use arith::ArithError;
pub use hash::{FastHashMap, FastHashSet, fast_hasher};
pub use text::Text;
