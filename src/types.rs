use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// How the child's standard streams are connected to the parent.
///
/// - `Pipe`: stdin/stdout/stderr are pipes owned by the controller.
/// - `Inherit`: the child shares the parent's streams (no capture).
/// - `Ignore`: the child's streams are connected to the null device.
///
/// An unset mode (`None` in [`ProcessOptions`](crate::config::ProcessOptions))
/// leaves the platform default in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StdioMode {
    Pipe,
    Inherit,
    Ignore,
}

impl StdioMode {
    pub fn as_str(self) -> &'static str {
        match self {
            StdioMode::Pipe => "pipe",
            StdioMode::Inherit => "inherit",
            StdioMode::Ignore => "ignore",
        }
    }
}

impl fmt::Display for StdioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoding applied to buffered output.
///
/// `Native` is the "no encoding given" case: chunks are read as UTF-8 and
/// trailing whitespace is trimmed. `Buffer` keeps the raw bytes. `Named`
/// carries a charset label; labels that are not recognized also produce raw
/// bytes (see [`crate::decode`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoding {
    Native,
    Buffer,
    Named(String),
}

impl Encoding {
    pub fn utf8() -> Self {
        Encoding::Named("utf8".to_string())
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Native => f.write_str("native"),
            Encoding::Buffer => f.write_str("buffer"),
            Encoding::Named(label) => f.write_str(label),
        }
    }
}

impl FromStr for Encoding {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "buffer" => Encoding::Buffer,
            "native" => Encoding::Native,
            label => Encoding::Named(label.to_string()),
        })
    }
}

impl<'de> Deserialize<'de> for Encoding {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        let Ok(encoding) = label.parse::<Encoding>();
        Ok(encoding)
    }
}

/// Shell used when the command should run inside a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shell {
    /// `/bin/sh` on unix, `%COMSPEC%` (or `cmd.exe`) on Windows.
    Default,
    /// An explicit shell program.
    Program(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawShell {
    Flag(bool),
    Program(String),
}

/// `shell = true` / `shell = "/bin/bash"`; `false` means no shell.
pub(crate) fn deserialize_shell<'de, D>(deserializer: D) -> Result<Option<Shell>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawShell>::deserialize(deserializer)? {
        Some(RawShell::Flag(true)) => Some(Shell::Default),
        Some(RawShell::Program(program)) => Some(Shell::Program(program)),
        Some(RawShell::Flag(false)) | None => None,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInput {
    Text(String),
    Bytes(Vec<u8>),
}

/// `input = "text"` or `input = [104, 105]`.
pub(crate) fn deserialize_input<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<RawInput>::deserialize(deserializer)?.map(|raw| match raw {
            RawInput::Text(text) => text.into_bytes(),
            RawInput::Bytes(bytes) => bytes,
        }),
    )
}
