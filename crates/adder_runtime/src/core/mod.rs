pub mod exceptions;
pub mod hash_key;
pub mod object;
pub mod types;

pub use hash_key::HashKey;
pub use object::{Kwargs, Object, Value, ValueIter};
pub use types::{TypeInfo, TypeObject};
