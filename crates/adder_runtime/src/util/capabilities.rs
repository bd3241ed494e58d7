//! System capability traits for dependency injection.

use std::io::{self, BufRead, BufReader};

/// Source of readable files for `open()`.
pub trait FileSystem {
    fn open_read(&self, path: &str) -> io::Result<Box<dyn BufRead>>;
}

pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn open_read(&self, path: &str) -> io::Result<Box<dyn BufRead>> {
        let file = std::fs::File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

pub struct Capabilities {
    pub fs: Box<dyn FileSystem>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            fs: Box::new(StdFileSystem),
        }
    }
}
