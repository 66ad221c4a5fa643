#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use childexec::{Encoding, ProcessOptions, ReadyHook, Shell, StdioMode};
use tokio::process::Child;

/// Builder for `ProcessOptions` to simplify test setup.
pub struct OptionsBuilder {
    options: ProcessOptions,
}

impl OptionsBuilder {
    pub fn new() -> Self {
        Self {
            options: ProcessOptions::default(),
        }
    }

    pub fn command(mut self, command: &str) -> Self {
        self.options.command = Some(command.to_string());
        self
    }

    pub fn file(mut self, file: &str) -> Self {
        self.options.file = Some(file.to_string());
        self
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.options.args = Some(args.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn argv(mut self, argv: &[&str]) -> Self {
        self.options.argv = Some(argv.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn buffer(mut self, val: bool) -> Self {
        self.options.buffer = Some(val);
        self
    }

    pub fn encoding(mut self, label: &str) -> Self {
        let Ok(encoding) = label.parse::<Encoding>();
        self.options.encoding = Some(encoding);
        self
    }

    pub fn stdio(mut self, mode: StdioMode) -> Self {
        self.options.stdio = Some(mode);
        self
    }

    pub fn silent(mut self, val: bool) -> Self {
        self.options.silent = val;
        self
    }

    pub fn pipe(mut self, val: bool) -> Self {
        self.options.pipe = val;
        self
    }

    pub fn inherit(mut self, val: bool) -> Self {
        self.options.inherit = val;
        self
    }

    pub fn ignore(mut self, val: bool) -> Self {
        self.options.ignore = val;
        self
    }

    pub fn input(mut self, input: &str) -> Self {
        self.options.input = Some(input.as_bytes().to_vec());
        self
    }

    pub fn ws(mut self, separator: &str) -> Self {
        self.options.ws = Some(separator.to_string());
        self
    }

    pub fn shell(mut self, shell: Shell) -> Self {
        self.options.shell = Some(shell);
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.options
            .env
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn ready<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Child, &ProcessOptions) + Send + Sync + 'static,
    {
        self.options.ready = Some(ReadyHook::new(hook));
        self
    }

    pub fn build(self) -> ProcessOptions {
        self.options
    }
}

impl Default for OptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
