// src/controller/mod.rs

//! Process result controller.
//!
//! Drives a single child process from launch to a single terminal result.
//!
//! - [`events`] defines the [`ProcessEvent`]s emitted while a child runs.
//! - [`lifecycle`] is the pure settlement state machine fed by those events.
//! - [`accumulator`] holds the buffered output chunks.
//! - [`platform`] wraps `tokio::process::Command`.
//! - [`runner`] is the async shell: it launches the child, spawns the
//!   reader/writer/waiter tasks and exposes [`promise`].

pub mod accumulator;
pub mod events;
pub mod lifecycle;
pub mod platform;
pub mod runner;

pub use accumulator::Accumulator;
pub use events::{ExitInfo, ProcessEvent, StdStream};
pub use lifecycle::{Lifecycle, SettlementState, Settled, Verdict};
pub use platform::{launch, PlatformError};
pub use runner::promise;
