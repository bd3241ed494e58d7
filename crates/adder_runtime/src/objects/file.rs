//! Read-only file handles returned by `open()`.

use std::cell::{Cell, RefCell};
use std::io::{self, BufRead, Read};
use std::rc::Rc;

use crate::Runtime;
use crate::core::exceptions::{FILE_NOT_FOUND_ERROR_TYPE, OS_ERROR_TYPE};
use crate::core::object::{AsAny, Object, Value, fallback_attr};
use crate::core::types::{OBJECT_TYPE, TypeInfo};
use crate::errors::messages::CLOSED_FILE;
use crate::errors::{RunError, RunResult};
use crate::methods::{BoundMethod, MethodKind};
use crate::objects::bytes::Bytes;
use crate::util::repr::repr_str;

pub static TEXT_FILE_TYPE: TypeInfo = TypeInfo::new("_io.TextIOWrapper", &OBJECT_TYPE);
pub static BINARY_FILE_TYPE: TypeInfo = TypeInfo::new("_io.BufferedReader", &OBJECT_TYPE);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    Text,
    Binary,
}

impl FileMode {
    pub fn parse(mode: &str) -> Option<Self> {
        match mode {
            "r" | "rt" => Some(FileMode::Text),
            "rb" | "br" => Some(FileMode::Binary),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            FileMode::Text => "r",
            FileMode::Binary => "rb",
        }
    }
}

pub struct File {
    name: String,
    mode: FileMode,
    translate_newlines: bool,
    reader: RefCell<Option<Box<dyn BufRead>>>,
    closed: Cell<bool>,
}

fn io_error(path: &str, e: io::Error) -> RunError {
    match e.kind() {
        io::ErrorKind::NotFound => RunError::os_error(
            &FILE_NOT_FOUND_ERROR_TYPE,
            format!("[Errno 2] No such file or directory: {}", repr_str(path)),
        ),
        _ => RunError::os_error(&OS_ERROR_TYPE, e.to_string()),
    }
}

/// Opens `path` through the runtime's file system capability.
pub fn open(rt: &Runtime, path: &str, mode: &str) -> RunResult<Value> {
    let Some(parsed) = FileMode::parse(mode) else {
        return Err(RunError::unsupported(&format!("open mode '{mode}'"), "file"));
    };
    let reader = rt.fs().open_read(path).map_err(|e| io_error(path, e))?;
    tracing::debug!(path, mode, "opened file");
    Ok(Value::new(File::new(path, parsed, reader, rt.config().newline_translation)))
}

impl File {
    pub fn new(name: &str, mode: FileMode, reader: Box<dyn BufRead>, translate_newlines: bool) -> Self {
        File {
            name: name.to_string(),
            mode,
            translate_newlines,
            reader: RefCell::new(Some(reader)),
            closed: Cell::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    pub fn close(&self) {
        if !self.closed.replace(true) {
            self.reader.borrow_mut().take();
            tracing::debug!(path = %self.name, "closed file");
        }
    }

    fn with_reader<T>(&self, f: impl FnOnce(&mut dyn BufRead) -> io::Result<T>) -> RunResult<T> {
        let mut slot = self.reader.borrow_mut();
        let Some(reader) = slot.as_mut() else {
            return Err(RunError::value_error(CLOSED_FILE));
        };
        f(reader.as_mut()).map_err(|e| io_error(&self.name, e))
    }

    fn wrap(&self, raw: Vec<u8>) -> RunResult<Value> {
        match self.mode {
            FileMode::Binary => Ok(Bytes::value(raw)),
            FileMode::Text => {
                let mut text = String::from_utf8(raw).map_err(|e| {
                    let pos = e.utf8_error().valid_up_to();
                    RunError::value_error(format!("'utf-8' codec can't decode byte {:#04x} in position {pos}", e.as_bytes()[pos]))
                })?;
                if self.translate_newlines && text.contains('\r') {
                    text = text.replace("\r\n", "\n");
                }
                Ok(Value::new_string(text))
            }
        }
    }

    /// Next line including its terminator, or an empty value at end of file.
    pub fn read_line(&self) -> RunResult<Value> {
        let raw = self.with_reader(|r| {
            let mut buf = Vec::new();
            r.read_until(b'\n', &mut buf)?;
            Ok(buf)
        })?;
        self.wrap(raw)
    }

    /// Up to `size` bytes (all remaining when `None`).
    pub fn read(&self, size: Option<usize>) -> RunResult<Value> {
        let raw = self.with_reader(|r| {
            let mut buf = Vec::new();
            match size {
                Some(n) => {
                    r.take(n as u64).read_to_end(&mut buf)?;
                }
                None => {
                    r.read_to_end(&mut buf)?;
                }
            }
            Ok(buf)
        })?;
        self.wrap(raw)
    }
}

impl Object for File {
    fn type_info(&self) -> &'static TypeInfo {
        match self.mode {
            FileMode::Text => &TEXT_FILE_TYPE,
            FileMode::Binary => &BINARY_FILE_TYPE,
        }
    }

    fn get_attr(self: Rc<Self>, name: &str) -> RunResult<Value> {
        match name {
            "name" => return Ok(Value::new_str(&self.name)),
            "mode" => return Ok(Value::new_str(self.mode.as_str())),
            "closed" => return Ok(Value::bool(self.is_closed())),
            _ => {}
        }
        let kind = MethodKind::from_str(name);
        if crate::methods::file::supports(kind) {
            return Ok(BoundMethod::value(self.into_value(), kind));
        }
        fallback_attr(self.type_info(), name)
    }

    fn iter(self: Rc<Self>) -> RunResult<Value> {
        if self.is_closed() {
            return Err(RunError::value_error(CLOSED_FILE));
        }
        Ok(self.into_value())
    }

    fn next(&self) -> RunResult<Option<Value>> {
        let line = self.read_line()?;
        if line.len()? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn enter(self: Rc<Self>) -> RunResult<Value> {
        if self.is_closed() {
            return Err(RunError::value_error(CLOSED_FILE));
        }
        Ok(self.into_value())
    }

    fn exit(&self) -> RunResult<()> {
        self.close();
        Ok(())
    }

    fn bool_value(&self) -> RunResult<bool> {
        Ok(true)
    }

    fn equals(&self, rhs: &Value) -> RunResult<bool> {
        Ok(crate::core::object::address_of(self) == rhs.addr())
    }

    fn hash_code(&self) -> RunResult<i64> {
        Ok(crate::core::object::identity_hash(self))
    }

    fn repr(&self) -> RunResult<String> {
        let name = repr_str(&self.name);
        Ok(match self.mode {
            FileMode::Text => format!("<_io.TextIOWrapper name={name} mode='r' encoding='UTF-8'>"),
            FileMode::Binary => format!("<_io.BufferedReader name={name}>"),
        })
    }

    fn has_iter(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exceptions::VALUE_ERROR_TYPE;

    fn text_file(content: &str, translate: bool) -> Value {
        let reader: Box<dyn BufRead> = Box::new(io::Cursor::new(content.as_bytes().to_vec()));
        Value::new(File::new("mem.txt", FileMode::Text, reader, translate))
    }

    #[test]
    fn iterates_lines_with_terminators() {
        let f = text_file("a\r\nb\nc", true);
        let lines: Vec<String> = f.iterate().unwrap().map(|v| v.unwrap().str().unwrap()).collect();
        assert_eq!(lines, vec!["a\n", "b\n", "c"]);
        assert!(f.next().unwrap().is_none());
    }

    #[test]
    fn raw_newlines_are_kept_without_translation() {
        let f = text_file("a\r\n", false);
        assert_eq!(f.downcast_ref::<File>().unwrap().read(None).unwrap().str().unwrap(), "a\r\n");
    }

    #[test]
    fn exit_closes_the_handle() {
        let f = text_file("x", true);
        let entered = f.enter().unwrap();
        assert!(entered.is(&f));
        f.exit().unwrap();
        let err = f.downcast_ref::<File>().unwrap().read_line().unwrap_err();
        assert!(err.matches(&VALUE_ERROR_TYPE));
        assert_eq!(err.to_string(), "ValueError: I/O operation on closed file.");
        assert_eq!(f.get_attr("closed").unwrap().repr().unwrap(), "True");
    }

    #[test]
    fn binary_reads_yield_bytes() {
        let reader: Box<dyn BufRead> = Box::new(io::Cursor::new(vec![0u8, 10, 255]));
        let f = File::new("blob", FileMode::Binary, reader, true);
        assert_eq!(f.read(Some(2)).unwrap().repr().unwrap(), "b'\\x00\\n'");
        assert_eq!(f.read(None).unwrap().repr().unwrap(), "b'\\xff'");
    }
}
