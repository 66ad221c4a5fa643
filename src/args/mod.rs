// src/args/mod.rs

//! Order-independent call arguments.
//!
//! Callers may pass any subset of a command string, an argument vector and a
//! [`ProcessOptions`] value, in any order. Each value is first turned into an
//! [`Arg`] (tagged by what it is), then [`normalize_arguments`] assigns every
//! tag to its role and resolves the missing pieces from the options.
//!
//! ```
//! use childexec::{args, normalize_arguments, ProcessOptions};
//!
//! let options = ProcessOptions { silent: true, ..Default::default() };
//! let invocation = normalize_arguments(args![options, ["-l"], "ls"]).unwrap();
//! assert_eq!(invocation.command, "ls");
//! assert_eq!(invocation.argv, vec!["-l".to_string()]);
//! ```

pub mod normalize;

use std::fmt;

use serde_json::Value;

use crate::config::ProcessOptions;

pub use normalize::{derive_stdio_mode, normalize_arguments, Invocation};

/// Role an argument plays in an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentRole {
    Command,
    Argv,
    Options,
}

impl fmt::Display for ArgumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentRole::Command => f.write_str("command"),
            ArgumentRole::Argv => f.write_str("argv"),
            ArgumentRole::Options => f.write_str("options"),
        }
    }
}

/// A single call argument, classified by type.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// A string: the executable (or a command line to split).
    Command(String),
    /// A sequence of strings: the argument vector.
    Argv(Vec<String>),
    /// An options object.
    Options(ProcessOptions),
    /// A value of any other type; normalization rejects it. The payload
    /// names the offending type.
    Unrecognized(String),
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Command(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Command(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Arg::Command(value.clone())
    }
}

impl From<Vec<String>> for Arg {
    fn from(value: Vec<String>) -> Self {
        Arg::Argv(value)
    }
}

impl From<Vec<&str>> for Arg {
    fn from(value: Vec<&str>) -> Self {
        Arg::Argv(value.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Arg {
    fn from(value: &[&str]) -> Self {
        Arg::Argv(value.iter().map(|s| s.to_string()).collect())
    }
}

impl From<&[String]> for Arg {
    fn from(value: &[String]) -> Self {
        Arg::Argv(value.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for Arg {
    fn from(value: [&str; N]) -> Self {
        Arg::Argv(value.iter().map(|s| s.to_string()).collect())
    }
}

impl From<ProcessOptions> for Arg {
    fn from(value: ProcessOptions) -> Self {
        Arg::Options(value)
    }
}

/// Borrowed options are copied, so the caller's value is never touched.
impl From<&ProcessOptions> for Arg {
    fn from(value: &ProcessOptions) -> Self {
        Arg::Options(value.clone())
    }
}

/// Classify a dynamically typed value.
///
/// - string -> [`Arg::Command`]
/// - array of strings -> [`Arg::Argv`]
/// - object -> [`Arg::Options`] (if it deserializes as [`ProcessOptions`])
/// - anything else -> [`Arg::Unrecognized`]
impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Arg::Command(s),
            Value::Array(items) => {
                let mut argv = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => argv.push(s),
                        other => {
                            return Arg::Unrecognized(format!(
                                "array containing {}",
                                json_type_name(&other)
                            ));
                        }
                    }
                }
                Arg::Argv(argv)
            }
            Value::Object(_) => match serde_json::from_value::<ProcessOptions>(value) {
                Ok(options) => Arg::Options(options),
                Err(e) => Arg::Unrecognized(format!("object ({e})")),
            },
            other => Arg::Unrecognized(json_type_name(&other).to_string()),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Build a `Vec<Arg>` from values of mixed types.
///
/// ```
/// use childexec::{args, Arg};
///
/// let list = args!["echo", ["hi"]];
/// assert_eq!(list[0], Arg::Command("echo".into()));
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        ::std::vec![$($crate::Arg::from($arg)),*]
    };
}
