pub mod execution;

pub use execution::{ExecutionError, TokioCommandRunner};

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

/// One child process to launch, fully resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandExecutionRequest {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub timeout: Duration,
}

impl CommandExecutionRequest {
    /// Command line rendered for logs.
    pub fn display(&self) -> String {
        let mut rendered = self.program.clone();
        for arg in &self.args {
            rendered.push(' ');
            if arg.contains(char::is_whitespace) || arg.is_empty() {
                rendered.push_str(&format!("{:?}", arg));
            } else {
                rendered.push_str(arg);
            }
        }
        rendered
    }
}

/// Captured output of a child that exited on its own.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandExecutionOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: i32,
}

#[async_trait]
pub trait CommandRunner: Send + Sync + 'static {
    async fn run(
        &self,
        request: &CommandExecutionRequest,
    ) -> Result<CommandExecutionOutput, ExecutionError>;
}
