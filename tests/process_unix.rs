// tests/process_unix.rs
#![cfg(unix)]

mod common;
use crate::common::{init_tracing, sh, TestResult};

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use childexec::{
    args, exec, is_spawn_error, promise, run, spawn, normalize_arguments, ChildExecError,
    FailureKind, Output, Shell, StdioMode,
};
use childexec_test_utils::builders::OptionsBuilder;
use childexec_test_utils::with_timeout;
use tokio::io::AsyncReadExt;
use tokio::process::ChildStdout;

fn expect_spawn_error(result: childexec::errors::Result<childexec::Completed>) -> childexec::SpawnError {
    match result {
        Err(ChildExecError::Spawn(err)) => err,
        Err(other) => panic!("Expected a spawn error, got: {other:?}"),
        Ok(done) => panic!("Expected failure, got: {done:?}"),
    }
}

#[tokio::test]
async fn spawn_buffers_raw_bytes_by_default() -> TestResult {
    init_tracing();

    let done = with_timeout(spawn(args!["echo", ["hello"]])).await?;

    assert_eq!(done.code, 0);
    assert_eq!(done.command, "echo");
    assert_eq!(done.path, "echo");
    assert_eq!(done.args, vec!["hello".to_string()]);
    assert_eq!(done.stdout, Some(Output::Bytes(b"hello\n".to_vec())));
    assert_eq!(done.stderr, Some(Output::Bytes(Vec::new())));
    assert_eq!(done.options.stdio, Some(StdioMode::Pipe));
    Ok(())
}

#[tokio::test]
async fn exec_decodes_utf8_through_the_shell() -> TestResult {
    let done = with_timeout(exec(args!["echo", ["héllo", "$((1 + 2))"]])).await?;

    assert_eq!(done.stdout_text(), Some("héllo 3\n"));
    assert_eq!(done.options.shell, Some(Shell::Default));
    Ok(())
}

#[tokio::test]
async fn native_encoding_trims_trailing_whitespace() -> TestResult {
    let options = OptionsBuilder::new().encoding("native").build();
    let done = with_timeout(spawn(args!["printf", ["a b\\n\\n  "], options])).await?;

    assert_eq!(done.stdout, Some(Output::Text("a b".to_string())));
    Ok(())
}

#[tokio::test]
async fn non_zero_exit_is_a_spawn_error_with_output() {
    init_tracing();

    let options = OptionsBuilder::new().encoding("utf8").build();
    let result = with_timeout(spawn(args![
        "sh",
        sh("echo out; echo err >&2; exit 2"),
        options
    ]))
    .await;
    let err = expect_spawn_error(result);

    assert!(is_spawn_error(&err));
    assert_eq!(err.kind, FailureKind::Exit);
    assert_eq!(err.code, Some(2));
    assert_eq!(err.signal, None);
    assert_eq!(err.to_string(), "command exited with code: 2");
    assert_eq!(err.syscall, "spawn sh");
    assert_eq!(err.spawnargs, sh("echo out; echo err >&2; exit 2"));
    assert_eq!(err.stdout, Some(Output::Text("out\n".to_string())));
    assert_eq!(err.stderr, Some(Output::Text("err\n".to_string())));
}

#[tokio::test]
async fn killed_child_reports_the_signal() {
    let result = with_timeout(spawn(args!["sh", sh("kill -9 $$")])).await;
    let err = expect_spawn_error(result);

    assert_eq!(err.kind, FailureKind::Exit);
    assert_eq!(err.code, None);
    assert_eq!(err.signal.as_deref(), Some("SIGKILL"));
    assert_eq!(err.to_string(), "command exited with code: none (signal: SIGKILL)");
}

#[tokio::test]
async fn missing_binary_is_a_process_failure() {
    let result = with_timeout(spawn(args![
        "/definitely/not/a/binary",
        ["x"]
    ]))
    .await;
    let err = expect_spawn_error(result);

    assert!(is_spawn_error(&err));
    assert_eq!(err.kind, FailureKind::Process);
    assert_eq!(err.code, None);
    assert!(err.source.is_some());
    assert_eq!(err.command, "/definitely/not/a/binary");
    assert_eq!(err.spawnargs, vec!["x".to_string()]);
}

#[tokio::test]
async fn input_is_written_to_stdin() -> TestResult {
    let options = OptionsBuilder::new().input("from parent\n").encoding("utf8").build();
    let done = with_timeout(spawn(args!["cat", Vec::<String>::new(), options])).await?;

    assert_eq!(done.stdout_text(), Some("from parent\n"));
    Ok(())
}

#[tokio::test]
async fn stdin_is_closed_without_input() -> TestResult {
    // `cat` would block forever on an open stdin.
    let done = with_timeout(spawn(args!["cat", Vec::<String>::new()])).await?;
    assert_eq!(done.stdout, Some(Output::Bytes(Vec::new())));
    Ok(())
}

#[tokio::test]
async fn unbuffered_pipe_output_is_not_returned() -> TestResult {
    let options = OptionsBuilder::new().buffer(false).build();
    let done = with_timeout(spawn(args![
        "sh",
        sh("head -c 200000 /dev/zero"),
        options
    ]))
    .await?;

    assert_eq!(done.stdout, None);
    assert_eq!(done.stderr, None);
    Ok(())
}

#[tokio::test]
async fn large_output_is_collected_completely() -> TestResult {
    let done = with_timeout(spawn(args!["sh", sh("head -c 100000 /dev/zero")])).await?;
    let stdout = done.stdout.map(Output::into_bytes).unwrap_or_default();
    assert_eq!(stdout.len(), 100_000);
    Ok(())
}

#[tokio::test]
async fn ignore_and_inherit_modes_capture_nothing() -> TestResult {
    let ignore = OptionsBuilder::new().ignore(true).build();
    let done = with_timeout(spawn(args!["echo", ["quiet"], ignore])).await?;
    assert_eq!(done.options.stdio, Some(StdioMode::Ignore));
    assert_eq!(done.stdout, None);

    let done = with_timeout(run(args!["true", Vec::<String>::new()])).await?;
    assert_eq!(done.options.stdio, Some(StdioMode::Inherit));
    assert_eq!(done.stdout, None);
    Ok(())
}

#[tokio::test]
async fn run_reports_failures_too() {
    let result = with_timeout(run(args!["exit", ["4"]])).await;
    let err = expect_spawn_error(result);
    assert_eq!(err.code, Some(4));
}

#[tokio::test]
async fn ready_hook_sees_the_live_child() -> TestResult {
    let called = Arc::new(AtomicBool::new(false));
    let pid = Arc::new(AtomicU32::new(0));

    let options = {
        let called = Arc::clone(&called);
        let pid = Arc::clone(&pid);
        OptionsBuilder::new()
            .ready(move |child, options| {
                assert_eq!(options.stdio, Some(StdioMode::Pipe));
                pid.store(child.id().unwrap_or(0), Ordering::SeqCst);
                called.store(true, Ordering::SeqCst);
            })
            .build()
    };

    with_timeout(spawn(args!["true", Vec::<String>::new(), options])).await?;

    assert!(called.load(Ordering::SeqCst));
    assert_ne!(pid.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn ready_hook_gets_the_piped_streams() -> TestResult {
    let seen = Arc::new(Mutex::new(None));

    let options = {
        let seen = Arc::clone(&seen);
        OptionsBuilder::new()
            .ready(move |child, _| {
                let streams = (
                    child.stdin.is_some(),
                    child.stdout.is_some(),
                    child.stderr.is_some(),
                );
                *seen.lock().unwrap() = Some(streams);
            })
            .build()
    };

    let done = with_timeout(spawn(args!["echo", ["x"], options])).await?;

    assert_eq!(*seen.lock().unwrap(), Some((true, true, true)));
    assert_eq!(done.stdout, Some(Output::Bytes(b"x\n".to_vec())));
    Ok(())
}

#[tokio::test]
async fn stream_taken_by_ready_hook_belongs_to_the_caller() -> TestResult {
    let taken: Arc<Mutex<Option<ChildStdout>>> = Arc::new(Mutex::new(None));

    let options = {
        let taken = Arc::clone(&taken);
        OptionsBuilder::new()
            .encoding("utf8")
            .ready(move |child, _| {
                *taken.lock().unwrap() = child.stdout.take();
            })
            .build()
    };

    let done = with_timeout(spawn(args!["sh", sh("echo mine; echo theirs >&2"), options])).await?;
    assert_eq!(done.stdout, Some(Output::Text(String::new())));
    assert_eq!(done.stderr_text(), Some("theirs\n"));

    let mut stdout = taken.lock().unwrap().take().ok_or("hook did not take stdout")?;
    let mut text = String::new();
    with_timeout(stdout.read_to_string(&mut text)).await?;
    assert_eq!(text, "mine\n");
    Ok(())
}

#[tokio::test]
async fn stdin_closed_by_the_child_is_an_input_failure() {
    init_tracing();

    // Far more than a pipe buffer, so the writer is still busy when the
    // child closes its end.
    let input = "y".repeat(4 * 1024 * 1024);
    let options = OptionsBuilder::new().input(&input).build();

    let result = with_timeout(spawn(args![
        "sh",
        sh("exec 0<&-; sleep 1"),
        options
    ]))
    .await;
    let err = expect_spawn_error(result);

    assert!(is_spawn_error(&err));
    assert_eq!(err.kind, FailureKind::Input);
    assert_eq!(err.code, None, "settled before the child exited");
    assert_eq!(
        err.source.as_ref().map(|e| e.kind()),
        Some(std::io::ErrorKind::BrokenPipe)
    );
}

#[tokio::test]
async fn cwd_and_env_are_passed_through() -> TestResult {
    let dir = tempfile::tempdir()?;
    let options = OptionsBuilder::new()
        .cwd(dir.path())
        .env("GREETING", "hi")
        .encoding("utf8")
        .build();

    let done = with_timeout(spawn(args![
        "/bin/sh",
        sh("echo $GREETING; pwd -P"),
        options
    ]))
    .await?;

    let expected_dir = dir.path().canonicalize()?;
    let stdout = done.stdout_text().unwrap_or_default().to_string();
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("hi"));
    assert_eq!(lines.next(), expected_dir.to_str());
    Ok(())
}

#[tokio::test]
async fn explicit_shell_program_is_used() -> TestResult {
    let options = OptionsBuilder::new()
        .shell(Shell::Program("/bin/sh".to_string()))
        .encoding("utf8")
        .build();
    let done = with_timeout(spawn(args!["echo", ["a", "&&", "echo", "b"], options])).await?;
    assert_eq!(done.stdout_text(), Some("a\nb\n"));
    Ok(())
}

#[tokio::test]
async fn concurrent_invocations_do_not_share_state() -> TestResult {
    let (a, b, c) = with_timeout(async {
        tokio::join!(
            exec(args!["sleep", ["0.2;", "echo", "first"]]),
            exec(args!["echo", ["second;", "exit", "3"]]),
            exec(args!["echo", ["third"]]),
        )
    })
    .await;

    assert_eq!(a?.stdout_text(), Some("first\n"));
    let err = expect_spawn_error(b);
    assert_eq!(err.code, Some(3));
    assert_eq!(err.stdout, Some(Output::Text("second\n".to_string())));
    assert_eq!(c?.stdout_text(), Some("third\n"));
    Ok(())
}

#[tokio::test]
async fn promise_runs_a_normalized_invocation_directly() -> TestResult {
    let options = OptionsBuilder::new().stdio(StdioMode::Pipe).buffer(true).build();
    let invocation = normalize_arguments(args!["echo hi there", options])?;

    let done = with_timeout(promise(invocation)).await?;
    assert_eq!(done.args, vec!["hi".to_string(), "there".to_string()]);
    // No encoding given: text with trailing whitespace removed.
    assert_eq!(done.stdout_text(), Some("hi there"));
    Ok(())
}

#[tokio::test]
async fn promise_without_pipe_settles_on_exit() -> TestResult {
    let invocation = normalize_arguments(args!["true", Vec::<String>::new()])?;
    assert_eq!(invocation.options.stdio, None);

    let done = with_timeout(promise(invocation)).await?;
    assert_eq!(done.code, 0);
    assert_eq!(done.stdout, None);
    Ok(())
}
