// src/config/model.rs

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use tokio::process::Child;

use crate::types::{deserialize_input, deserialize_shell, Encoding, Shell, StdioMode};

/// Options for a single child process invocation.
///
/// The same struct is used for:
/// - positional-argument alternatives (`command`/`file`, `args`/`argv`),
/// - controller behaviour (`buffer`, `encoding`, `input`, `ready`),
/// - stdio selection (`stdio` plus the `silent`/`pipe`/`inherit`/`ignore`
///   shorthands),
/// - options passed straight to the platform launcher (`shell`, `cwd`,
///   `env`, `uid`, `gid`, `argv0`, `detached`).
///
/// It can be read from TOML:
///
/// ```toml
/// command = "git"
/// args = ["status", "--short"]
/// encoding = "utf8"
/// silent = true
/// cwd = "/srv/repo"
/// ```
///
/// Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProcessOptions {
    /// Alternative to passing the command positionally.
    pub command: Option<String>,

    /// Fallback for `command`.
    pub file: Option<String>,

    /// Alternative to passing the argument vector positionally.
    pub args: Option<Vec<String>>,

    /// Fallback for `args`.
    pub argv: Option<Vec<String>>,

    /// Accumulate stdout/stderr. Only honoured when stdio is `pipe`.
    pub buffer: Option<bool>,

    /// How buffered output is decoded. `None` behaves like
    /// [`Encoding::Native`].
    pub encoding: Option<Encoding>,

    /// Explicit stdio mode; takes priority over the shorthands below.
    pub stdio: Option<StdioMode>,

    /// Shorthand for `stdio = "pipe"`.
    pub silent: bool,

    /// Shorthand for `stdio = "pipe"`.
    pub pipe: bool,

    /// Shorthand for `stdio = "inherit"`.
    pub inherit: bool,

    /// Shorthand for `stdio = "ignore"`.
    pub ignore: bool,

    /// Written to the child's stdin (pipe mode only), which is then closed.
    #[serde(deserialize_with = "deserialize_input")]
    pub input: Option<Vec<u8>>,

    /// Separator used to split `command` when no argument vector was found.
    /// Defaults to a single space.
    pub ws: Option<String>,

    /// Called with the live child right after it was created.
    #[serde(skip)]
    pub ready: Option<ReadyHook>,

    /// Run the command line inside a shell.
    #[serde(deserialize_with = "deserialize_shell")]
    pub shell: Option<Shell>,

    /// Working directory of the child.
    pub cwd: Option<PathBuf>,

    /// Complete environment of the child. When set, the parent's
    /// environment is not inherited.
    pub env: Option<BTreeMap<String, String>>,

    /// User id of the child (unix only).
    pub uid: Option<u32>,

    /// Group id of the child (unix only).
    pub gid: Option<u32>,

    /// Value of `argv[0]` seen by the child (unix only).
    pub argv0: Option<String>,

    /// Start the child in its own process group.
    pub detached: bool,
}

type ReadyFn = dyn Fn(&mut Child, &ProcessOptions) + Send + Sync;

/// Callback invoked with the process handle and the normalized options
/// immediately after the child has been created.
///
/// The child still owns its piped `stdin`, `stdout` and `stderr`. A stream
/// the hook takes belongs to the caller from then on: its output is not
/// buffered, its end of file is not awaited, and `input` is not written to a
/// taken stdin.
///
/// The hook runs synchronously on the controller's task. Its panics are not
/// caught.
#[derive(Clone)]
pub struct ReadyHook(Arc<ReadyFn>);

impl ReadyHook {
    pub fn new<F>(hook: F) -> Self
    where
        F: Fn(&mut Child, &ProcessOptions) + Send + Sync + 'static,
    {
        Self(Arc::new(hook))
    }

    pub(crate) fn call(&self, child: &mut Child, options: &ProcessOptions) {
        (self.0)(child, options)
    }
}

impl fmt::Debug for ReadyHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ReadyHook(..)")
    }
}

/// Two hooks are equal when they share the same closure.
impl PartialEq for ReadyHook {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
