// src/outcome.rs

use crate::config::ProcessOptions;
use crate::decode::Output;

/// Successful result of a child process invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Completed {
    /// Always `0`.
    pub code: i32,
    pub signal: Option<String>,
    /// Same as `command`.
    pub path: String,
    pub command: String,
    pub args: Vec<String>,
    /// The options the child was run with, defaults included.
    pub options: ProcessOptions,
    /// Decoded stdout; only present when output was buffered.
    pub stdout: Option<Output>,
    /// Decoded stderr; only present when output was buffered.
    pub stderr: Option<Output>,
}

impl Completed {
    /// Buffered stdout as text, if it was decoded to text.
    pub fn stdout_text(&self) -> Option<&str> {
        self.stdout.as_ref().and_then(Output::as_text)
    }

    /// Buffered stderr as text, if it was decoded to text.
    pub fn stderr_text(&self) -> Option<&str> {
        self.stderr.as_ref().and_then(Output::as_text)
    }
}
