use async_trait::async_trait;
use prompt_runner::core::{Backend, InvocationResult, PromptRunner, RunnerConfig};
use prompt_runner::tools::{
    CommandExecutionOutput, CommandExecutionRequest, CommandRunner, ExecutionError,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Replays a fixed outcome and remembers what it was asked to run.
struct ScriptedRunner {
    outcome: fn(&CommandExecutionRequest) -> Result<CommandExecutionOutput, ExecutionError>,
    seen: Mutex<Vec<CommandExecutionRequest>>,
}

impl ScriptedRunner {
    fn new(
        outcome: fn(&CommandExecutionRequest) -> Result<CommandExecutionOutput, ExecutionError>,
    ) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn last(&self) -> CommandExecutionRequest {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(
        &self,
        request: &CommandExecutionRequest,
    ) -> Result<CommandExecutionOutput, ExecutionError> {
        self.seen.lock().unwrap().push(request.clone());
        (self.outcome)(request)
    }
}

fn captured(stdout: &str, stderr: &str, exit_code: i32) -> CommandExecutionOutput {
    CommandExecutionOutput {
        stdout: stdout.as_bytes().to_vec(),
        stderr: stderr.as_bytes().to_vec(),
        exit_code,
    }
}

#[tokio::test]
async fn test_ollama_invocation_and_stdout_result() {
    let runner = ScriptedRunner::new(|_| Ok(captured("hello world\n", "", 0)));
    let prompt_runner = PromptRunner::with_runner(RunnerConfig::default(), runner.clone()).unwrap();

    let result = prompt_runner.run("say hello").await;

    assert_eq!(result, InvocationResult::completed(0, "hello world", ""));
    let request = runner.last();
    assert_eq!(request.program, "ollama");
    assert_eq!(request.args, vec!["run", "codellama:7b-instruct", "say hello"]);
    assert_eq!(request.cwd, None);
    assert_eq!(request.timeout, Duration::from_secs(120));
}

#[tokio::test]
async fn test_script_invocation_runs_in_project_root() {
    let runner = ScriptedRunner::new(|_| Ok(captured("", "AVX = 1\nAnswer: 42\n", 0)));
    let mut config = RunnerConfig::with_project_root(PathBuf::from("/opt/llama"));
    config.runner.backend = Backend::Script;
    let prompt_runner = PromptRunner::with_runner(config, runner.clone()).unwrap();

    let result = prompt_runner.run("  what is six times seven  ").await;

    assert!(result.success);
    assert_eq!(result.output, "Answer: 42");
    assert_eq!(result.error, "AVX = 1\nAnswer: 42");

    let request = runner.last();
    assert_eq!(request.cwd, Some(PathBuf::from("/opt/llama")));
    assert_eq!(
        request.args,
        vec![
            "-m",
            "models/7B/ggml-model-q4_0.gguf",
            "-p",
            "what is six times seven",
            "-n",
            "512",
            "-t",
            "4",
        ]
    );
    assert_eq!(request.timeout, Duration::from_secs(180));
}

#[tokio::test]
async fn test_stderr_fallback_can_be_disabled() {
    let runner = ScriptedRunner::new(|_| Ok(captured("", "Answer: 42\n", 0)));
    let mut config = RunnerConfig::default();
    config.runner.stderr_fallback = false;
    let prompt_runner = PromptRunner::with_runner(config, runner).unwrap();

    let result = prompt_runner.run("question").await;

    assert_eq!(result.output, "");
    assert_eq!(result.error, "Answer: 42");
    assert!(result.success);
}

#[tokio::test]
async fn test_non_zero_exit_is_not_success() {
    let runner = ScriptedRunner::new(|_| Ok(captured("partial", "model not loaded\n", 2)));
    let prompt_runner = PromptRunner::with_runner(RunnerConfig::default(), runner).unwrap();

    let result = prompt_runner.run("question").await;

    assert_eq!(
        result,
        InvocationResult {
            success: false,
            output: "partial".to_string(),
            error: "model not loaded".to_string(),
            code: 2,
        }
    );
}

#[tokio::test]
async fn test_execution_errors_become_failed_results() {
    let not_found = ScriptedRunner::new(|request| {
        Err(ExecutionError::NotFound {
            program: request.program.clone(),
        })
    });
    let prompt_runner = PromptRunner::with_runner(RunnerConfig::default(), not_found).unwrap();
    assert_eq!(
        prompt_runner.run("hi").await,
        InvocationResult::failure("ollama command not found", 127)
    );

    let timed_out = ScriptedRunner::new(|request| {
        Err(ExecutionError::Timeout {
            timeout: request.timeout,
        })
    });
    let prompt_runner = PromptRunner::with_runner(RunnerConfig::default(), timed_out).unwrap();
    assert_eq!(
        prompt_runner.run("hi").await,
        InvocationResult::failure("Timeout after 2 minutes", 1)
    );
}

#[tokio::test]
async fn test_invalid_filter_pattern_is_rejected_up_front() {
    let mut config = RunnerConfig::default();
    config.filter.patterns = vec!["(unclosed".to_string()];
    let runner = ScriptedRunner::new(|_| Ok(captured("", "", 0)));

    let err = PromptRunner::with_runner(config, runner).err().unwrap();
    assert!(err.message.contains("filter.patterns"));
}

#[cfg(unix)]
#[tokio::test]
#[serial_test::serial]
async fn test_real_child_end_to_end() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::TempDir::new().unwrap();
    let script = dir.path().join("fake-ollama");
    std::fs::write(&script, "#!/bin/sh\necho \"model=$2 prompt=$3\"\n").unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let mut config = RunnerConfig::default();
    config.set_program(script.to_string_lossy().into_owned());
    let prompt_runner = PromptRunner::new(config).unwrap();

    let result = prompt_runner.run("why is the sky blue?").await;
    assert_eq!(
        result,
        InvocationResult::completed(0, "model=codellama:7b-instruct prompt=why is the sky blue?", "")
    );
}
