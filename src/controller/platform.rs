// src/controller/platform.rs

//! Thin wrapper around `tokio::process::Command`.
//!
//! [`launch`] maps an executable, an argument vector and the pass-through
//! [`ProcessOptions`] onto a Tokio command and spawns it. It knows nothing
//! about buffering or settlement.

use std::io;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::{Child, Command};
use tracing::debug;

use crate::config::ProcessOptions;
use crate::types::{Shell, StdioMode};

/// Error returned by the platform layer when a child cannot be created.
///
/// It has no identity marker, but carries `spawnargs` and `syscall`, so
/// [`crate::identity::is_spawn_error`] still recognises it.
#[derive(Error, Debug)]
#[error("{syscall} failed: {error}")]
pub struct PlatformError {
    #[source]
    pub error: io::Error,
    pub path: String,
    pub spawnargs: Vec<String>,
    pub syscall: String,
}

/// Spawn `command` with `argv`, applying the platform options.
pub fn launch(
    command: &str,
    argv: &[String],
    options: &ProcessOptions,
) -> Result<Child, PlatformError> {
    let mut cmd = build_command(command, argv, options);

    let child = cmd.spawn().map_err(|error| PlatformError {
        error,
        path: command.to_string(),
        spawnargs: argv.to_vec(),
        syscall: format!("spawn {command}"),
    })?;

    debug!(command, pid = ?child.id(), "child process created");
    Ok(child)
}

/// Build the Tokio command without spawning it.
pub fn build_command(command: &str, argv: &[String], options: &ProcessOptions) -> Command {
    let mut cmd = match &options.shell {
        Some(shell) => shell_command(shell, command, argv),
        None => {
            let mut c = Command::new(command);
            c.args(argv);
            c
        }
    };

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    if let Some(env) = &options.env {
        cmd.env_clear();
        cmd.envs(env);
    }

    if let Some(mode) = options.stdio {
        cmd.stdin(stdio_for(mode))
            .stdout(stdio_for(mode))
            .stderr(stdio_for(mode));
    }

    apply_platform_options(&mut cmd, options);
    cmd
}

fn stdio_for(mode: StdioMode) -> Stdio {
    match mode {
        StdioMode::Pipe => Stdio::piped(),
        StdioMode::Inherit => Stdio::inherit(),
        StdioMode::Ignore => Stdio::null(),
    }
}

/// The command line is the command and its arguments joined by spaces; no
/// quoting is applied.
fn shell_line(command: &str, argv: &[String]) -> String {
    std::iter::once(command)
        .chain(argv.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(unix)]
fn shell_command(shell: &Shell, command: &str, argv: &[String]) -> Command {
    let program = match shell {
        Shell::Default => "/bin/sh",
        Shell::Program(program) => program.as_str(),
    };
    let mut c = Command::new(program);
    c.arg("-c").arg(shell_line(command, argv));
    c
}

#[cfg(windows)]
fn shell_command(shell: &Shell, command: &str, argv: &[String]) -> Command {
    let program = match shell {
        Shell::Default => std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string()),
        Shell::Program(program) => program.clone(),
    };
    let line = shell_line(command, argv);
    let mut c = Command::new(&program);
    if program.to_ascii_lowercase().ends_with("cmd.exe") || program.eq_ignore_ascii_case("cmd") {
        c.args(["/d", "/s", "/c"]).raw_arg(format!("\"{line}\""));
    } else {
        c.arg("-c").arg(line);
    }
    c
}

#[cfg(unix)]
fn apply_platform_options(cmd: &mut Command, options: &ProcessOptions) {
    if let Some(uid) = options.uid {
        cmd.uid(uid);
    }
    if let Some(gid) = options.gid {
        cmd.gid(gid);
    }
    if let Some(argv0) = &options.argv0 {
        cmd.arg0(argv0);
    }
    if options.detached {
        cmd.process_group(0);
    }
}

#[cfg(windows)]
fn apply_platform_options(cmd: &mut Command, options: &ProcessOptions) {
    const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

    if options.detached {
        cmd.creation_flags(CREATE_NEW_PROCESS_GROUP);
    }
}
