// src/controller/runner.rs

//! Async shell around [`Lifecycle`].
//!
//! [`promise`] launches the child, attaches one Tokio task per watched
//! stream (output readers, stdin writer, exit waiter) and consumes their
//! [`ProcessEvent`]s from a single channel. The consuming loop is the only
//! place that touches the lifecycle, so accumulation and settlement need no
//! locking.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::args::Invocation;
use crate::config::ProcessOptions;
use crate::controller::events::{ExitInfo, ProcessEvent, StdStream};
use crate::controller::lifecycle::{exit_message, Lifecycle, Settled, Verdict};
use crate::controller::platform::launch;
use crate::errors::SpawnError;
use crate::identity::ERROR_MARKER;
use crate::outcome::Completed;
use crate::types::StdioMode;

const CHUNK_SIZE: usize = 8 * 1024;

/// Run a normalized invocation to completion.
///
/// Resolves once with either the successful [`Completed`] value or a
/// [`SpawnError`]. Nothing is retried and there is no cancellation: dropping
/// the future leaves the child running.
pub async fn promise(invocation: Invocation) -> Result<Completed, SpawnError> {
    let Invocation {
        command,
        argv,
        options,
    } = invocation;

    let stdio_is_pipe = options.stdio == Some(StdioMode::Pipe);
    let should_buffer = stdio_is_pipe && options.buffer == Some(true);

    let mut lifecycle = Lifecycle::new(should_buffer, options.encoding.clone());
    let (tx, mut rx) = mpsc::channel::<ProcessEvent>(64);
    let mut readers: Vec<JoinHandle<()>> = Vec::new();

    info!(command = %command, ?argv, stdio = ?options.stdio, buffer = should_buffer, "starting child process");

    match launch(&command, &argv, &options) {
        Ok(mut child) => {
            // The hook sees every stream. Whatever it takes is no longer
            // watched, read or written here.
            if let Some(ready) = &options.ready {
                debug!(command = %command, "invoking ready hook");
                ready.call(&mut child, &options);
            }

            if stdio_is_pipe {
                if let Some(stdout) = child.stdout.take() {
                    lifecycle.watch_stream();
                    readers.push(spawn_reader(StdStream::Stdout, stdout, should_buffer, tx.clone()));
                }
                if let Some(stderr) = child.stderr.take() {
                    lifecycle.watch_stream();
                    readers.push(spawn_reader(StdStream::Stderr, stderr, should_buffer, tx.clone()));
                }
                // Without input, stdin is dropped (closed) here.
                if let (Some(stdin), Some(input)) = (child.stdin.take(), options.input.clone()) {
                    spawn_writer(stdin, input, tx.clone());
                }
            }

            spawn_waiter(child, tx.clone());
        }
        Err(err) => {
            warn!(command = %command, error = %err, "failed to spawn child process");
            if let Some(settled) = lifecycle.step(ProcessEvent::ProcessError(err.error)) {
                return into_result(command, argv, options, settled);
            }
        }
    }

    drop(tx);

    let settled = loop {
        let event = rx.recv().await.unwrap_or_else(|| {
            ProcessEvent::ProcessError(io::Error::other(
                "child process events ended before the process closed",
            ))
        });

        if let Some(settled) = lifecycle.step(event) {
            break settled;
        }
    };

    // Release the output streams on every exit path.
    for reader in readers {
        reader.abort();
    }

    into_result(command, argv, options, settled)
}

fn into_result(
    command: String,
    argv: Vec<String>,
    options: ProcessOptions,
    settled: Settled,
) -> Result<Completed, SpawnError> {
    let Settled {
        verdict,
        exit,
        stdout,
        stderr,
    } = settled;

    match verdict {
        Verdict::Success => {
            info!(command = %command, exit_code = ?exit.code, "child process succeeded");
            Ok(Completed {
                code: exit.code.unwrap_or(0),
                signal: exit.signal,
                path: command.clone(),
                command,
                args: argv,
                options,
                stdout,
                stderr,
            })
        }
        Verdict::Failure { kind, error } => {
            let message = match &error {
                Some(error) => error.to_string(),
                None => exit_message(&exit),
            };
            info!(
                command = %command,
                exit_code = ?exit.code,
                signal = ?exit.signal,
                %kind,
                "child process failed: {message}"
            );
            let ExitInfo { code, signal } = exit;
            Err(SpawnError {
                message,
                source: error,
                kind,
                marker: ERROR_MARKER,
                code,
                signal,
                path: command.clone(),
                syscall: format!("spawn {command}"),
                command,
                spawnargs: argv,
                options,
                stdout,
                stderr,
            })
        }
    }
}

/// Read `reader` to end of file in chunks.
///
/// Chunks are forwarded only when `forward` is set; otherwise they are
/// discarded so the child never blocks on a full pipe.
fn spawn_reader<R>(
    stream: StdStream,
    mut reader: R,
    forward: bool,
    tx: mpsc::Sender<ProcessEvent>,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            match reader.read(&mut buf).await {
                Ok(0) => {
                    let _ = tx.send(ProcessEvent::StreamClosed { stream }).await;
                    break;
                }
                Ok(n) => {
                    if forward {
                        let chunk = buf[..n].to_vec();
                        if tx.send(ProcessEvent::Data { stream, chunk }).await.is_err() {
                            break;
                        }
                    }
                }
                Err(error) => {
                    let _ = tx.send(ProcessEvent::StreamError { stream, error }).await;
                    break;
                }
            }
        }
        debug!(%stream, "output reader finished");
    })
}

/// Write `input` to stdin, then close it.
fn spawn_writer(mut stdin: ChildStdin, input: Vec<u8>, tx: mpsc::Sender<ProcessEvent>) {
    tokio::spawn(async move {
        let result = async {
            stdin.write_all(&input).await?;
            stdin.shutdown().await
        }
        .await;

        match result {
            Ok(()) => debug!(bytes = input.len(), "input written to stdin"),
            Err(error) => {
                let _ = tx.send(ProcessEvent::InputError(error)).await;
            }
        }
        // `stdin` is dropped here, closing the pipe.
    });
}

/// Wait for the child to exit and report its status.
fn spawn_waiter(mut child: Child, tx: mpsc::Sender<ProcessEvent>) {
    tokio::spawn(async move {
        let pid = child.id();
        let event = match child.wait().await {
            Ok(status) => {
                let exit = ExitInfo::from(status);
                debug!(?pid, exit_code = ?exit.code, signal = ?exit.signal, "child process exited");
                ProcessEvent::Exited(exit)
            }
            Err(error) => ProcessEvent::ProcessError(error),
        };
        let _ = tx.send(event).await;
    });
}
