use crate::tools::{CommandExecutionOutput, CommandExecutionRequest, CommandRunner};
use async_trait::async_trait;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

/// Failures raised while launching or waiting on a child process.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("{program} command not found")]
    NotFound { program: String },

    #[error("Timeout after {}", describe_timeout(.timeout))]
    Timeout { timeout: Duration },

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Human wording of a timeout bound: whole minutes when possible, else seconds.
pub fn describe_timeout(timeout: &Duration) -> String {
    let secs = timeout.as_secs();
    if timeout.subsec_nanos() != 0 {
        return plural(timeout.as_millis() as u64, "millisecond");
    }
    if secs >= 60 && secs % 60 == 0 {
        plural(secs / 60, "minute")
    } else {
        plural(secs, "second")
    }
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

/// Runs the child on the tokio process driver; kills and reaps it when the bound elapses.
pub struct TokioCommandRunner;

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(
        &self,
        request: &CommandExecutionRequest,
    ) -> Result<CommandExecutionOutput, ExecutionError> {
        let mut command = Command::new(&request.program);
        command
            .args(&request.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &request.cwd {
            command.current_dir(cwd);
        }

        let mut child = command.spawn().map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ExecutionError::NotFound {
                    program: request.program.clone(),
                }
            } else {
                ExecutionError::Spawn {
                    program: request.program.clone(),
                    source,
                }
            }
        })?;
        tracing::debug!(pid = child.id(), "child process started");

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let waited = tokio::time::timeout(request.timeout, async {
            tokio::try_join!(child.wait(), drain(stdout), drain(stderr))
        })
        .await;

        match waited {
            Ok(Ok((status, stdout, stderr))) => Ok(CommandExecutionOutput {
                stdout,
                stderr,
                exit_code: exit_code_of(status),
            }),
            Ok(Err(source)) => Err(ExecutionError::Wait {
                program: request.program.clone(),
                source,
            }),
            Err(_) => {
                tracing::warn!(
                    pid = child.id(),
                    timeout_ms = request.timeout.as_millis() as u64,
                    "child exceeded timeout, killing"
                );
                // kill() also waits, so the child is reaped before we return
                if let Err(err) = child.kill().await {
                    tracing::warn!(error = %err, "failed to kill timed out child");
                }
                Err(ExecutionError::Timeout {
                    timeout: request.timeout,
                })
            }
        }
    }
}

async fn drain<R: AsyncRead + Unpin>(reader: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut reader) = reader {
        reader.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}
