// src/facade.rs

//! Option presets around [`promise`].
//!
//! | entry point | buffer            | encoding         | stdio            | shell             |
//! |-------------|-------------------|------------------|------------------|-------------------|
//! | [`spawn`]   | `true` if unset   | `buffer` if unset| `pipe` if unset  | untouched         |
//! | [`exec`]    | forced `true`     | `utf8` if unset  | forced `pipe`    | on, unless a program is set |
//! | [`run`]     | untouched         | untouched        | forced `inherit` | on, unless a program is set |

use tracing::debug;

use crate::args::{normalize_arguments, Arg};
use crate::config::ProcessOptions;
use crate::controller::promise;
use crate::errors::Result;
use crate::outcome::Completed;
use crate::types::{Encoding, Shell, StdioMode};

/// Spawn a process. In pipe mode (the default) output is buffered as raw
/// bytes unless `buffer` is turned off.
pub async fn spawn<I>(args: I) -> Result<Completed>
where
    I: IntoIterator,
    I::Item: Into<Arg>,
{
    let mut invocation = normalize_arguments(args)?;
    apply_spawn_defaults(&mut invocation.options);
    debug!(command = %invocation.command, "spawn preset applied");
    Ok(promise(invocation).await?)
}

/// Run the command inside a shell and buffer its output as UTF-8 text.
pub async fn exec<I>(args: I) -> Result<Completed>
where
    I: IntoIterator,
    I::Item: Into<Arg>,
{
    let mut invocation = normalize_arguments(args)?;
    apply_exec_defaults(&mut invocation.options);
    debug!(command = %invocation.command, "exec preset applied");
    Ok(promise(invocation).await?)
}

/// Run the command inside a shell, sharing the parent's stdio.
pub async fn run<I>(args: I) -> Result<Completed>
where
    I: IntoIterator,
    I::Item: Into<Arg>,
{
    let mut invocation = normalize_arguments(args)?;
    apply_run_defaults(&mut invocation.options);
    debug!(command = %invocation.command, "run preset applied");
    Ok(promise(invocation).await?)
}

pub fn apply_spawn_defaults(options: &mut ProcessOptions) {
    if options.buffer.is_none() {
        options.buffer = Some(true);
    }
    if options.encoding.is_none() {
        options.encoding = Some(Encoding::Buffer);
    }
    if options.stdio.is_none() {
        options.stdio = Some(StdioMode::Pipe);
    }
}

pub fn apply_exec_defaults(options: &mut ProcessOptions) {
    if options.encoding.is_none() {
        options.encoding = Some(Encoding::utf8());
    }
    force_shell(options);
    options.stdio = Some(StdioMode::Pipe);
    options.buffer = Some(true);
}

pub fn apply_run_defaults(options: &mut ProcessOptions) {
    force_shell(options);
    options.stdio = Some(StdioMode::Inherit);
}

/// An explicit shell program is kept; anything else becomes the default
/// shell.
fn force_shell(options: &mut ProcessOptions) {
    if !matches!(options.shell, Some(Shell::Program(_))) {
        options.shell = Some(Shell::Default);
    }
}
