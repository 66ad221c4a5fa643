// src/controller/events.rs

use std::fmt;
use std::io;
use std::process::ExitStatus;

/// An output stream of the child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StdStream {
    Stdout,
    Stderr,
}

impl fmt::Display for StdStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StdStream::Stdout => f.write_str("stdout"),
            StdStream::Stderr => f.write_str("stderr"),
        }
    }
}

/// Exit code and terminating signal of a child.
///
/// Both are `None` until the child has exited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExitInfo {
    pub code: Option<i32>,
    pub signal: Option<String>,
}

impl ExitInfo {
    pub fn code(code: i32) -> Self {
        Self {
            code: Some(code),
            signal: None,
        }
    }

    pub fn signal(name: impl Into<String>) -> Self {
        Self {
            code: None,
            signal: Some(name.into()),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for ExitInfo {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
            signal: signal_name(&status),
        }
    }
}

#[cfg(unix)]
fn signal_name(status: &ExitStatus) -> Option<String> {
    use nix::sys::signal::Signal;
    use std::os::unix::process::ExitStatusExt;

    let raw = status.signal()?;
    Some(match Signal::try_from(raw) {
        Ok(signal) => signal.as_str().to_string(),
        Err(_) => format!("SIG{raw}"),
    })
}

#[cfg(not(unix))]
fn signal_name(_status: &ExitStatus) -> Option<String> {
    None
}

/// Notifications from the tasks that watch a running child.
///
/// Data for one stream arrives in the order the child wrote it.
#[derive(Debug)]
pub enum ProcessEvent {
    /// A chunk was read from an output pipe.
    Data { stream: StdStream, chunk: Vec<u8> },
    /// An output pipe reached end of file.
    StreamClosed { stream: StdStream },
    /// Reading an output pipe failed.
    StreamError { stream: StdStream, error: io::Error },
    /// Writing `input` to stdin failed.
    InputError(io::Error),
    /// The child could not be spawned or waited on.
    ProcessError(io::Error),
    /// The child exited.
    Exited(ExitInfo),
}

impl ProcessEvent {
    /// Short name of the event, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            ProcessEvent::Data { .. } => "data",
            ProcessEvent::StreamClosed { .. } => "stream-closed",
            ProcessEvent::StreamError { .. } => "stream-error",
            ProcessEvent::InputError(_) => "input-error",
            ProcessEvent::ProcessError(_) => "process-error",
            ProcessEvent::Exited(_) => "exited",
        }
    }
}
