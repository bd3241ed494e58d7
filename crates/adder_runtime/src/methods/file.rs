use crate::core::object::{Kwargs, Object, Value};
use crate::errors::{RunError, RunResult};
use crate::objects::file::File;

use super::MethodKind;
use super::common::{arity, opt_int};

pub(crate) fn supports(kind: MethodKind) -> bool {
    matches!(kind, MethodKind::ReadLine | MethodKind::Read | MethodKind::Close)
}

pub(super) fn dispatch(f: &File, kind: MethodKind, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    match kind {
        MethodKind::ReadLine => {
            arity(kind, args, kwargs, 0, 0)?;
            f.read_line()
        }
        MethodKind::Read => {
            arity(kind, args, kwargs, 0, 1)?;
            // Negative sizes read everything, as `None` does.
            let size = opt_int(args, 0)?.and_then(|n| usize::try_from(n).ok());
            f.read(size)
        }
        MethodKind::Close => {
            arity(kind, args, kwargs, 0, 0)?;
            f.close();
            Ok(Value::none())
        }
        _ => Err(RunError::unsupported(kind.name(), f.type_info().name)),
    }
}
