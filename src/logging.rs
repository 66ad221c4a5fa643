// src/logging.rs

//! Subscriber setup for the `childexec` binary.
//!
//! `--log-level` sets one level for everything. Without it, `CHILDEXEC_LOG`
//! is read as an [`EnvFilter`] directive list, so single modules can be
//! turned up, e.g. `CHILDEXEC_LOG=warn,childexec::controller=trace`. With
//! neither, `info` is used.
//!
//! Output goes to stderr; stdout carries only the child's output.

use anyhow::{anyhow, Result};
use tracing::warn;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "CHILDEXEC_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();

    let (filter, rejected) = match build_filter(cli_level, env.as_deref()) {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new(DEFAULT_DIRECTIVE), Some(err)),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))?;

    if let Some(err) = rejected {
        warn!(env = LOG_ENV, error = %err, "ignoring invalid log directives, using `info`");
    }

    Ok(())
}

/// Filter for the given CLI level and `CHILDEXEC_LOG` value.
///
/// A blank or missing `env` yields the default filter.
pub fn build_filter(
    cli_level: Option<LogLevel>,
    env: Option<&str>,
) -> std::result::Result<EnvFilter, ParseError> {
    if let Some(level) = cli_level {
        return Ok(EnvFilter::new(level.as_str()));
    }

    match env.map(str::trim).filter(|directives| !directives.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives),
        None => Ok(EnvFilter::new(DEFAULT_DIRECTIVE)),
    }
}
