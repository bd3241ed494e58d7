use std::io::Write;

use adder_core::hash::FastHashMap;

use crate::builtins_registry::{BuiltinProvider, BuiltinRegistry, StdBuiltinProvider};
use crate::core::object::{Kwargs, Value};
use crate::errors::{RunError, RunResult};
use crate::util::capabilities::{Capabilities, FileSystem};

#[derive(Clone, Copy, Debug)]
pub struct RuntimeConfig {
    /// Buffer `print` output for [`Runtime::take_output`] instead of writing to stdout.
    pub capture_output: bool,
    /// Fold `\r\n` to `\n` when reading text files.
    pub newline_translation: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { capture_output: false, newline_translation: true }
    }
}

/// Per-thread execution context handed to every call.
pub struct Runtime {
    config: RuntimeConfig,
    caps: Capabilities,
    builtins: FastHashMap<String, Value>,
    output: String,
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self::with_provider(config, &StdBuiltinProvider)
    }

    pub fn with_provider(config: RuntimeConfig, provider: &dyn BuiltinProvider) -> Self {
        let mut registry = BuiltinRegistry::new();
        provider.install(&mut registry);
        let builtins = registry.into_scope();
        tracing::debug!(builtins = builtins.len(), ?config, "runtime initialized");
        Self { config, caps: Capabilities::default(), builtins, output: String::new() }
    }

    pub fn config(&self) -> RuntimeConfig {
        self.config
    }

    pub fn set_file_system(&mut self, fs: Box<dyn FileSystem>) {
        self.caps.fs = fs;
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.caps.fs.as_ref()
    }

    /// Resolves a name in the builtin scope.
    pub fn builtin(&self, name: &str) -> Option<Value> {
        self.builtins.get(name).cloned()
    }

    pub fn builtin_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builtins.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Looks up and calls a builtin. Unknown names are a coverage gap.
    pub fn call_builtin(&mut self, name: &str, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
        let Some(f) = self.builtin(name) else {
            return Err(RunError::unsupported(name, "builtins"));
        };
        tracing::trace!(name, argc = args.len(), "builtin call");
        f.call(self, args, kwargs)
    }

    pub fn write_output(&mut self, s: &str) {
        if self.config.capture_output {
            self.output.push_str(s);
            return;
        }
        let mut out = std::io::stdout().lock();
        if let Err(e) = out.write_all(s.as_bytes()).and_then(|_| out.flush()) {
            tracing::warn!(error = %e, "failed to write program output");
        }
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    /// Renders an error that escaped the program. Raised exceptions and
    /// coverage gaps are rendered distinctly.
    pub fn report_uncaught(&self, err: &RunError) -> String {
        match err {
            RunError::Raise(exc) => {
                tracing::warn!(kind = exc.kind().name, "uncaught exception");
                format!("Traceback (most recent call last):\n{exc}")
            }
            RunError::Unsupported(msg) => {
                tracing::error!(%msg, "coverage gap reached");
                format!("InternalError: unsupported operation: {msg}")
            }
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_resolve_by_name() {
        let mut rt = Runtime::new();
        assert!(rt.builtin("len").is_some());
        assert!(rt.builtin("zip").is_some());
        assert!(rt.builtin("input").is_none());
        let n = rt.call_builtin("len", &[Value::new_str("abc")], None).unwrap();
        assert_eq!(n.repr().unwrap(), "3");
        assert!(rt.call_builtin("input", &[], None).unwrap_err().is_unsupported());
        assert!(rt.builtin_names().contains(&"StopIteration"));
    }

    #[test]
    fn uncaught_reports_keep_the_two_classes_apart() {
        let rt = Runtime::new();
        let raised = RunError::value_error("bad");
        assert_eq!(rt.report_uncaught(&raised), "Traceback (most recent call last):\nValueError: bad");
        let bare = RunError::stop_iteration();
        assert_eq!(rt.report_uncaught(&bare), "Traceback (most recent call last):\nStopIteration");
        let gap = RunError::unsupported("matmul", "int");
        assert_eq!(
            rt.report_uncaught(&gap),
            "InternalError: unsupported operation: 'matmul' unimplemented for 'int'"
        );
    }

    #[test]
    fn captured_output_is_drained() {
        let mut rt = Runtime::with_config(RuntimeConfig { capture_output: true, ..RuntimeConfig::default() });
        rt.write_output("a");
        rt.write_output("b\n");
        assert_eq!(rt.take_output(), "ab\n");
        assert_eq!(rt.take_output(), "");
    }
}
