// src/lib.rs

//! Promise-style child processes.
//!
//! Call arguments are accepted in any order (a command string, an argument
//! vector, an options value), normalized into an [`Invocation`], and run to a
//! single terminal result: [`Completed`] on exit code 0, [`SpawnError`]
//! otherwise.
//!
//! - [`args`](mod@args) classifies and normalizes call arguments.
//! - [`controller`] runs one child and settles its result exactly once.
//! - [`decode`] turns buffered chunks into text or bytes.
//! - [`identity`] recognises errors produced here.
//! - [`facade`] offers the `spawn`/`exec`/`run` presets.
//!
//! ```no_run
//! # async fn demo() -> childexec::errors::Result<()> {
//! use childexec::{args, exec};
//!
//! let done = exec(args!["git status --short", childexec::ProcessOptions::default()]).await?;
//! println!("{}", done.stdout_text().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod args;
pub mod cli;
pub mod config;
pub mod controller;
pub mod decode;
pub mod errors;
pub mod facade;
pub mod identity;
pub mod logging;
pub mod outcome;
pub mod types;

pub use args::{normalize_arguments, Arg, ArgumentRole, Invocation};
pub use config::{ProcessOptions, ReadyHook};
pub use controller::promise;
pub use decode::Output;
pub use errors::{ArgumentError, ChildExecError, FailureKind, SpawnError};
pub use facade::{exec, run, spawn};
pub use identity::{is_spawn_error, is_spawn_error_dyn, ERROR_MARKER};
pub use outcome::Completed;
pub use types::{Encoding, Shell, StdioMode};
