//! Adder runtime: the object model that translated programs execute against.

#![allow(clippy::should_implement_trait)]
#![allow(clippy::len_without_is_empty)]
#![allow(clippy::new_without_default)]
#![allow(clippy::module_inception)]

pub mod core;
pub mod errors;
pub mod iter;
pub mod objects;
pub mod util;

pub mod builtins;
pub mod builtins_registry;
mod methods;
mod runtime;

pub use crate::builtins::{BuiltinFn, BuiltinFunction};
pub use crate::builtins_registry::{BuiltinProvider, BuiltinRegistry, StdBuiltinProvider, TypeRegistry};
pub use crate::core::exceptions::Exception;
pub use crate::core::{HashKey, Kwargs, Object, TypeInfo, TypeObject, Value, ValueIter};
pub use crate::errors::{RunError, RunResult};
pub use crate::methods::BoundMethod;
pub use crate::runtime::{Runtime, RuntimeConfig};
pub use crate::util::capabilities::{Capabilities, FileSystem, StdFileSystem};
