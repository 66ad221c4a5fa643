// src/identity.rs

//! Recognising errors that come from a child process invocation.
//!
//! Errors built by the controller carry [`ERROR_MARKER`]. Errors produced by
//! the platform layer alone have no marker but expose `spawnargs` and
//! `syscall`, which is accepted as a fallback.

use std::error::Error as StdError;
use std::io;

use crate::controller::PlatformError;
use crate::errors::{ArgumentError, ChildExecError, SpawnError};

/// Identity marker stored in every [`SpawnError`].
pub const ERROR_MARKER: &str = "childexec::spawn-error";

/// Fields inspected by [`is_spawn_error`].
pub trait ErrorIdentity {
    fn marker(&self) -> Option<&str> {
        None
    }

    fn spawnargs(&self) -> Option<&[String]> {
        None
    }

    fn syscall(&self) -> Option<&str> {
        None
    }
}

impl ErrorIdentity for SpawnError {
    fn marker(&self) -> Option<&str> {
        Some(self.marker)
    }

    fn spawnargs(&self) -> Option<&[String]> {
        Some(&self.spawnargs)
    }

    fn syscall(&self) -> Option<&str> {
        Some(&self.syscall)
    }
}

impl ErrorIdentity for PlatformError {
    fn spawnargs(&self) -> Option<&[String]> {
        Some(&self.spawnargs)
    }

    fn syscall(&self) -> Option<&str> {
        Some(&self.syscall)
    }
}

impl ErrorIdentity for ChildExecError {
    fn marker(&self) -> Option<&str> {
        self.as_spawn_error().and_then(ErrorIdentity::marker)
    }

    fn spawnargs(&self) -> Option<&[String]> {
        self.as_spawn_error().and_then(ErrorIdentity::spawnargs)
    }

    fn syscall(&self) -> Option<&str> {
        self.as_spawn_error().and_then(ErrorIdentity::syscall)
    }
}

impl ErrorIdentity for ArgumentError {}

impl ErrorIdentity for io::Error {}

/// Whether `error` originated from a child process invocation.
///
/// The marker decides when present; otherwise both `spawnargs` and
/// `syscall` must be set.
pub fn is_spawn_error<E>(error: &E) -> bool
where
    E: ErrorIdentity + ?Sized,
{
    match error.marker() {
        Some(marker) => marker == ERROR_MARKER,
        None => error.spawnargs().is_some() && error.syscall().is_some(),
    }
}

/// [`is_spawn_error`] for type-erased errors (e.g. from `anyhow`).
///
/// Walks the source chain and checks every error whose type is known.
pub fn is_spawn_error_dyn(error: &(dyn StdError + 'static)) -> bool {
    std::iter::successors(Some(error), |&e| e.source()).any(|e| {
        if let Some(err) = e.downcast_ref::<SpawnError>() {
            is_spawn_error(err)
        } else if let Some(err) = e.downcast_ref::<PlatformError>() {
            is_spawn_error(err)
        } else if let Some(err) = e.downcast_ref::<ChildExecError>() {
            is_spawn_error(err)
        } else {
            false
        }
    })
}
