// src/errors.rs

//! Crate-wide error types.
//!
//! - [`ArgumentError`]: the call could not be normalized; no process was
//!   created.
//! - [`SpawnError`]: the child could not be launched, one of its streams
//!   failed, or it exited unsuccessfully.
//! - [`ChildExecError`]: umbrella type returned by the facade and the config
//!   loader.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::args::ArgumentRole;
use crate::config::ProcessOptions;
use crate::controller::StdStream;
use crate::decode::Output;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("`{0}` was passed multiple times")]
    Duplicate(ArgumentRole),

    #[error("an unknown argument type was passed: {0}")]
    UnrecognizedType(String),

    #[error("neither `command` nor `options` were passed")]
    MissingCommand,

    #[error("neither `options.command` nor `options.file` were passed")]
    MissingCommandOption,

    #[error("neither `argv` nor `options` were passed")]
    MissingArgv,

    #[error("`command` must not be an empty string")]
    EmptyCommand,
}

/// What triggered a [`SpawnError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The process could not be created or waited on.
    Process,
    /// Reading one of the output pipes failed.
    Stream(StdStream),
    /// Writing `input` to the child's stdin failed.
    Input,
    /// The child exited without success.
    Exit,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Process => f.write_str("process"),
            FailureKind::Stream(stream) => write!(f, "{stream} stream"),
            FailureKind::Input => f.write_str("stdin stream"),
            FailureKind::Exit => f.write_str("exit"),
        }
    }
}

/// Failure of a child process invocation.
///
/// Carries everything needed to diagnose the run without repeating it. The
/// `marker` field always holds [`crate::identity::ERROR_MARKER`]; use
/// [`crate::identity::is_spawn_error`] to recognise these errors behind
/// trait objects.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct SpawnError {
    pub message: String,
    #[source]
    pub source: Option<io::Error>,
    pub kind: FailureKind,
    pub marker: &'static str,
    /// Exit code, if the child exited before the failure was observed.
    pub code: Option<i32>,
    /// Terminating signal name (e.g. `SIGKILL`), if any.
    pub signal: Option<String>,
    pub path: String,
    pub command: String,
    pub spawnargs: Vec<String>,
    /// Always `"spawn <command>"`.
    pub syscall: String,
    pub options: ProcessOptions,
    /// Decoded stdout; only present when output was buffered.
    pub stdout: Option<Output>,
    /// Decoded stderr; only present when output was buffered.
    pub stderr: Option<Output>,
}

#[derive(Error, Debug)]
pub enum ChildExecError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl ChildExecError {
    /// The spawn failure, if this error is one.
    pub fn as_spawn_error(&self) -> Option<&SpawnError> {
        match self {
            ChildExecError::Spawn(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ChildExecError>;
