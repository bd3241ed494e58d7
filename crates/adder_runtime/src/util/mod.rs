pub mod capabilities;
pub mod format;
pub mod repr;

pub use capabilities::{Capabilities, FileSystem, StdFileSystem};
