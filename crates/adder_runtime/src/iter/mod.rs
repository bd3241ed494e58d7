//! The iterator protocol: `next` yields `Ok(Some(v))` until it yields
//! `Ok(None)`, and stays exhausted afterwards.

pub mod dict;
pub mod enumerate;
pub mod range;
pub mod reversed;
pub mod seq;
pub mod zip;

pub use dict::{DictIterKind, DictIterator};
pub use enumerate::{ENUMERATE_TYPE, Enumerate};
pub use range::RangeIterator;
pub use reversed::{REVERSED_TYPE, Reversed};
pub use zip::{ZIP_TYPE, Zip};
