// src/cli.rs

//! Command-line interface of the `childexec` binary (`clap` derive).

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::{error, info};

use crate::args::Arg;
use crate::config::{load_options, ProcessOptions};
use crate::decode::Output;
use crate::errors::{ChildExecError, Result};
use crate::facade::{exec, run, spawn};
use crate::types::Encoding;

/// Command-line arguments for `childexec`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "childexec",
    version,
    about = "Run a child process and report its exit status and captured output.",
    long_about = None
)]
pub struct CliArgs {
    /// Which preset to use.
    #[arg(long, value_enum, default_value_t = Mode::Exec)]
    pub mode: Mode,

    /// TOML file with process options. Flags below override it.
    #[arg(long, value_name = "PATH")]
    pub options: Option<PathBuf>,

    /// Decoding of buffered output (`buffer`, `native`, `utf8`, `latin1`, ...).
    #[arg(long, value_name = "ENCODING")]
    pub encoding: Option<String>,

    /// Text written to the child's stdin.
    #[arg(long, value_name = "TEXT")]
    pub input: Option<String>,

    /// Working directory of the child.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CHILDEXEC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Command and its arguments. A single word is split on spaces.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Facade preset selected with `--mode`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Spawn,
    Exec,
    Run,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

/// Merge the options file and the flags into an argument list for the
/// facade.
pub fn build_arguments(args: &CliArgs) -> Result<Vec<Arg>> {
    let mut options = match &args.options {
        Some(path) => load_options(path)?,
        None => ProcessOptions::default(),
    };

    if let Some(label) = &args.encoding {
        let Ok(encoding) = label.parse::<Encoding>();
        options.encoding = Some(encoding);
    }
    if let Some(input) = &args.input {
        options.input = Some(input.clone().into_bytes());
    }
    if let Some(cwd) = &args.cwd {
        options.cwd = Some(cwd.clone());
    }

    let mut list = Vec::with_capacity(3);
    match args.command.split_first() {
        Some((command, rest)) => {
            list.push(Arg::Command(command.clone()));
            if !rest.is_empty() {
                list.push(Arg::Argv(rest.to_vec()));
            }
        }
        None if options.command.is_none() && options.file.is_none() => {
            return Err(ChildExecError::ConfigError(
                "no command given on the command line or in the options file".to_string(),
            ));
        }
        None => {}
    }
    list.push(Arg::Options(options));

    Ok(list)
}

/// Run the child described by `args` and return the exit code for this
/// process: the child's code, 1 when it has none, 2 for invalid arguments.
pub async fn execute(args: CliArgs) -> Result<i32> {
    let list = build_arguments(&args)?;

    let outcome = match args.mode {
        Mode::Spawn => spawn(list).await,
        Mode::Exec => exec(list).await,
        Mode::Run => run(list).await,
    };

    match outcome {
        Ok(done) => {
            write_output(done.stdout.as_ref(), done.stderr.as_ref())?;
            info!(command = %done.command, "child process completed");
            Ok(0)
        }
        Err(ChildExecError::Spawn(err)) => {
            write_output(err.stdout.as_ref(), err.stderr.as_ref())?;
            error!(
                command = %err.command,
                exit_code = ?err.code,
                signal = ?err.signal,
                kind = %err.kind,
                "{err}"
            );
            Ok(err.code.filter(|code| *code != 0).unwrap_or(1))
        }
        Err(ChildExecError::Argument(err)) => {
            error!(error = %err, "invalid arguments");
            Ok(2)
        }
        Err(other) => Err(other),
    }
}

fn write_output(stdout: Option<&Output>, stderr: Option<&Output>) -> Result<()> {
    if let Some(output) = stdout {
        write_stream(&mut std::io::stdout().lock(), output)?;
    }
    if let Some(output) = stderr {
        write_stream(&mut std::io::stderr().lock(), output)?;
    }
    Ok(())
}

fn write_stream(out: &mut impl Write, output: &Output) -> std::io::Result<()> {
    out.write_all(output.as_bytes())?;
    if let Output::Text(text) = output {
        if !text.is_empty() && !text.ends_with('\n') {
            out.write_all(b"\n")?;
        }
    }
    out.flush()
}
