// src/controller/lifecycle.rs

//! Pure settlement state machine for one child process.
//!
//! [`Lifecycle`] consumes [`ProcessEvent`]s and decides when, and how, the
//! invocation settles:
//! - output chunks are accumulated while buffering is enabled;
//! - the child counts as closed once it has exited **and** every watched
//!   output stream reached end of file;
//! - a closed child with exit code 0 settles as success, anything else as
//!   failure;
//! - any stream, input or process error settles as failure right away.
//!
//! Settlement happens at most once. Events arriving afterwards are dropped.
//!
//! There are no channels, no Tokio types and no IO in here; the async shell
//! in [`super::runner`] feeds events in and turns the [`Settled`] value into
//! the caller-facing result.

use std::io;

use tracing::{debug, trace};

use crate::controller::accumulator::Accumulator;
use crate::controller::events::{ExitInfo, ProcessEvent};
use crate::decode::Output;
use crate::errors::FailureKind;
use crate::types::Encoding;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementState {
    Pending,
    Succeeded,
    Failed,
}

#[derive(Debug)]
pub enum Verdict {
    Success,
    Failure {
        kind: FailureKind,
        /// The underlying error; `None` for an unsuccessful exit.
        error: Option<io::Error>,
    },
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Success)
    }
}

/// Terminal outcome produced by [`Lifecycle::step`].
#[derive(Debug)]
pub struct Settled {
    pub verdict: Verdict,
    pub exit: ExitInfo,
    pub stdout: Option<Output>,
    pub stderr: Option<Output>,
}

#[derive(Debug)]
pub struct Lifecycle {
    state: SettlementState,
    exit: ExitInfo,
    exited: bool,
    open_streams: usize,
    accumulator: Option<Accumulator>,
    encoding: Option<Encoding>,
}

impl Lifecycle {
    /// `buffer` enables output accumulation; `encoding` is applied when the
    /// accumulated output is decoded at settlement.
    pub fn new(buffer: bool, encoding: Option<Encoding>) -> Self {
        Self {
            state: SettlementState::Pending,
            exit: ExitInfo::default(),
            exited: false,
            open_streams: 0,
            accumulator: buffer.then(Accumulator::new),
            encoding,
        }
    }

    /// Register an output stream that must reach end of file before the
    /// child counts as closed.
    pub fn watch_stream(&mut self) {
        self.open_streams += 1;
    }

    pub fn state(&self) -> SettlementState {
        self.state
    }

    pub fn is_settled(&self) -> bool {
        self.state != SettlementState::Pending
    }

    /// Feed one event; returns the outcome if this event settled the
    /// invocation.
    pub fn step(&mut self, event: ProcessEvent) -> Option<Settled> {
        if self.is_settled() {
            debug!(event = event.name(), state = ?self.state, "ignoring event after settlement");
            return None;
        }

        match event {
            ProcessEvent::Data { stream, chunk } => {
                if let Some(accumulator) = self.accumulator.as_mut() {
                    trace!(%stream, bytes = chunk.len(), "accumulating chunk");
                    accumulator.push(stream, chunk);
                }
                None
            }
            ProcessEvent::StreamClosed { stream } => {
                self.open_streams = self.open_streams.saturating_sub(1);
                trace!(%stream, open_streams = self.open_streams, "output stream closed");
                self.maybe_close()
            }
            ProcessEvent::StreamError { stream, error } => {
                Some(self.settle(Verdict::Failure {
                    kind: FailureKind::Stream(stream),
                    error: Some(error),
                }))
            }
            ProcessEvent::InputError(error) => Some(self.settle(Verdict::Failure {
                kind: FailureKind::Input,
                error: Some(error),
            })),
            ProcessEvent::ProcessError(error) => Some(self.settle(Verdict::Failure {
                kind: FailureKind::Process,
                error: Some(error),
            })),
            ProcessEvent::Exited(exit) => {
                self.exit = exit;
                self.exited = true;
                self.maybe_close()
            }
        }
    }

    fn maybe_close(&mut self) -> Option<Settled> {
        if !self.exited || self.open_streams > 0 {
            return None;
        }

        let verdict = if self.exit.success() {
            Verdict::Success
        } else {
            Verdict::Failure {
                kind: FailureKind::Exit,
                error: None,
            }
        };
        Some(self.settle(verdict))
    }

    fn settle(&mut self, verdict: Verdict) -> Settled {
        self.state = if verdict.is_success() {
            SettlementState::Succeeded
        } else {
            SettlementState::Failed
        };

        let (stdout, stderr) = match self.accumulator.take() {
            Some(accumulator) => {
                let (stdout, stderr) = accumulator.decode(self.encoding.as_ref());
                (Some(stdout), Some(stderr))
            }
            None => (None, None),
        };

        Settled {
            verdict,
            exit: self.exit.clone(),
            stdout,
            stderr,
        }
    }
}

/// Message used when a child closes without success.
///
/// Always `command exited with code: <code>`; a child without an exit code
/// reports `none`, followed by the terminating signal when there is one.
pub fn exit_message(exit: &ExitInfo) -> String {
    match (exit.code, &exit.signal) {
        (Some(code), _) => format!("command exited with code: {code}"),
        (None, Some(signal)) => format!("command exited with code: none (signal: {signal})"),
        (None, None) => "command exited with code: none".to_string(),
    }
}
