//! Concrete value kinds.

pub mod bool;
pub mod bytes;
pub mod dict;
pub mod dict_views;
pub mod file;
pub mod int;
pub mod list;
pub mod none;
pub mod range;
pub(crate) mod sequence;
pub mod set;
pub mod slice;
pub mod str;
pub mod tuple;

pub use self::bool::{BOOL_TYPE, Bool};
pub use self::bytes::{BYTEARRAY_TYPE, BYTES_TYPE, ByteArray, Bytes};
pub use self::dict::{DICT_TYPE, Dict, DictEntry};
pub use self::dict_views::DictView;
pub use self::file::File;
pub use self::int::{INT_TYPE, Int};
pub use self::list::{LIST_TYPE, List};
pub use self::none::NONE_TYPE;
pub use self::range::{RANGE_TYPE, Range};
pub use self::set::{SET_TYPE, Set};
pub use self::slice::{SLICE_TYPE, Slice};
pub use self::str::{STR_TYPE, Str};
pub use self::tuple::{TUPLE_TYPE, Tuple};

use crate::core::object::Value;

/// Kinds that support `seq * n`.
pub(crate) fn is_repeatable(v: &Value) -> bool {
    v.downcast_ref::<Str>().is_some()
        || v.downcast_ref::<List>().is_some()
        || v.downcast_ref::<Tuple>().is_some()
        || v.downcast_ref::<Bytes>().is_some()
        || v.downcast_ref::<ByteArray>().is_some()
}
