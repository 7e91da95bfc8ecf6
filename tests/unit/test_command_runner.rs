#![cfg(unix)]

use prompt_runner::tools::{
    CommandExecutionRequest, CommandRunner, ExecutionError, TokioCommandRunner,
};
use serial_test::serial;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn request(program: &Path, args: &[&str], timeout: Duration) -> CommandExecutionRequest {
    CommandExecutionRequest {
        program: program.to_string_lossy().into_owned(),
        args: args.iter().map(|s| s.to_string()).collect(),
        cwd: None,
        timeout,
    }
}

#[tokio::test]
#[serial]
async fn test_captures_both_streams_and_exit_code() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "both", "echo out\necho err >&2\nexit 7");

    let output = TokioCommandRunner
        .run(&request(&script, &[], Duration::from_secs(10)))
        .await
        .unwrap();

    assert_eq!(output.stdout, b"out\n");
    assert_eq!(output.stderr, b"err\n");
    assert_eq!(output.exit_code, 7);
}

#[tokio::test]
#[serial]
async fn test_arguments_are_not_shell_interpreted() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "args", "printf '%s\\n' \"$@\"");

    let output = TokioCommandRunner
        .run(&request(
            &script,
            &["a b", "$(echo pwned)", "; rm -rf /"],
            Duration::from_secs(10),
        ))
        .await
        .unwrap();

    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "a b\n$(echo pwned)\n; rm -rf /\n"
    );
}

#[tokio::test]
#[serial]
async fn test_large_output_on_both_streams_does_not_deadlock() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        dir.path(),
        "chatty",
        "i=0\nwhile [ $i -lt 4000 ]; do\n  echo \"stdout line $i padding padding padding\"\n  echo \"stderr line $i padding padding padding\" >&2\n  i=$((i+1))\ndone",
    );

    let output = TokioCommandRunner
        .run(&request(&script, &[], Duration::from_secs(30)))
        .await
        .unwrap();

    assert_eq!(output.exit_code, 0);
    assert_eq!(output.stdout.iter().filter(|b| **b == b'\n').count(), 4000);
    assert_eq!(output.stderr.iter().filter(|b| **b == b'\n').count(), 4000);
}

#[tokio::test]
#[serial]
async fn test_timeout_kills_and_reaps_child() {
    let dir = TempDir::new().unwrap();
    let pid_file = dir.path().join("pid");
    let script = write_script(
        dir.path(),
        "sleeper",
        &format!("echo $$ > '{}'\nexec sleep 30", pid_file.display()),
    );

    let started = Instant::now();
    let err = TokioCommandRunner
        .run(&request(&script, &[], Duration::from_millis(500)))
        .await
        .unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(matches!(err, ExecutionError::Timeout { .. }));
    assert_eq!(err.to_string(), "Timeout after 500 milliseconds");

    let pid = fs::read_to_string(&pid_file).unwrap();
    let alive = std::process::Command::new("kill")
        .args(["-0", pid.trim()])
        .status()
        .unwrap();
    assert!(!alive.success());
}

#[tokio::test]
async fn test_missing_program_is_not_found() {
    let err = TokioCommandRunner
        .run(&request(
            Path::new("prompt-runner-missing-runtime"),
            &[],
            Duration::from_secs(5),
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, ExecutionError::NotFound { .. }));
    assert_eq!(err.to_string(), "prompt-runner-missing-runtime command not found");
}

#[tokio::test]
#[serial]
async fn test_signalled_child_reports_negative_code() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "selfkill", "kill -TERM $$");

    let output = TokioCommandRunner
        .run(&request(&script, &[], Duration::from_secs(10)))
        .await
        .unwrap();

    assert_eq!(output.exit_code, -15);
}

#[tokio::test]
#[serial]
async fn test_runs_in_requested_directory() {
    let dir = TempDir::new().unwrap();
    let workdir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "where", "pwd -P");

    let mut req = request(&script, &[], Duration::from_secs(10));
    req.cwd = Some(workdir.path().to_path_buf());
    let output = TokioCommandRunner.run(&req).await.unwrap();

    let expected = fs::canonicalize(workdir.path()).unwrap();
    assert_eq!(
        String::from_utf8(output.stdout).unwrap().trim_end(),
        expected.to_str().unwrap()
    );
}
