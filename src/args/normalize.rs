// src/args/normalize.rs

use tracing::trace;

use crate::args::{Arg, ArgumentRole};
use crate::config::ProcessOptions;
use crate::errors::ArgumentError;
use crate::types::StdioMode;

/// Normalized `(command, argv, options)` triple, ready to be executed.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub command: String,
    pub argv: Vec<String>,
    pub options: ProcessOptions,
}

/// Turn an unordered list of arguments into an [`Invocation`].
///
/// At most one argument per role is accepted. Missing pieces are resolved
/// from the options:
/// - command: `options.command`, then `options.file`;
/// - argv: `options.args`, then `options.argv`, then the tail of `command`
///   split on `options.ws` (default `" "`), in which case the head becomes
///   the command.
///
/// `options.stdio` is derived from the shorthand flags when unset.
pub fn normalize_arguments<I>(args: I) -> Result<Invocation, ArgumentError>
where
    I: IntoIterator,
    I::Item: Into<Arg>,
{
    let mut command: Option<String> = None;
    let mut argv: Option<Vec<String>> = None;
    let mut options: Option<ProcessOptions> = None;

    for arg in args {
        match arg.into() {
            Arg::Command(value) => assign(&mut command, value, ArgumentRole::Command)?,
            Arg::Argv(value) => assign(&mut argv, value, ArgumentRole::Argv)?,
            Arg::Options(value) => assign(&mut options, value, ArgumentRole::Options)?,
            Arg::Unrecognized(type_name) => {
                return Err(ArgumentError::UnrecognizedType(type_name));
            }
        }
    }

    let mut command = match command {
        Some(command) => command,
        None => {
            let opts = options.as_ref().ok_or(ArgumentError::MissingCommand)?;
            opts.command
                .clone()
                .or_else(|| opts.file.clone())
                .ok_or(ArgumentError::MissingCommandOption)?
        }
    };

    let argv = match argv {
        Some(argv) => argv,
        None => {
            let opts = options.as_ref().ok_or(ArgumentError::MissingArgv)?;
            match opts.args.clone().or_else(|| opts.argv.clone()) {
                Some(argv) => argv,
                None => {
                    let separator = opts.ws.as_deref().unwrap_or(" ");
                    let (head, tail) = split_command(&command, separator);
                    trace!(command = %command, separator, "splitting command line");
                    command = head;
                    tail
                }
            }
        }
    };

    if command.trim().is_empty() {
        return Err(ArgumentError::EmptyCommand);
    }

    let mut options = options.unwrap_or_default();
    if options.stdio.is_none() {
        options.stdio = derive_stdio_mode(&options);
    }

    Ok(Invocation {
        command,
        argv,
        options,
    })
}

/// Stdio mode implied by the shorthand flags, in priority order
/// `silent`/`pipe`, `inherit`, `ignore`.
///
/// This ignores `options.stdio`; callers only use it when `stdio` is unset.
pub fn derive_stdio_mode(options: &ProcessOptions) -> Option<StdioMode> {
    if options.silent || options.pipe {
        Some(StdioMode::Pipe)
    } else if options.inherit {
        Some(StdioMode::Inherit)
    } else if options.ignore {
        Some(StdioMode::Ignore)
    } else {
        None
    }
}

fn assign<T>(slot: &mut Option<T>, value: T, role: ArgumentRole) -> Result<(), ArgumentError> {
    if slot.is_some() {
        return Err(ArgumentError::Duplicate(role));
    }
    *slot = Some(value);
    Ok(())
}

/// Literal split: empty tokens are kept, an empty separator yields one token
/// per character.
fn split_command(command: &str, separator: &str) -> (String, Vec<String>) {
    let mut tokens: Vec<String> = if separator.is_empty() {
        command.chars().map(String::from).collect()
    } else {
        command.split(separator).map(str::to_string).collect()
    };

    if tokens.is_empty() {
        return (String::new(), Vec::new());
    }
    let head = tokens.remove(0);
    (head, tokens)
}
