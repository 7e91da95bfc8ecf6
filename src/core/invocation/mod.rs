use crate::core::config::RunnerConfig;
use crate::core::types::Backend;
use crate::tools::CommandExecutionRequest;
use std::path::{Path, PathBuf};

/// Builds the external command line for the configured backend.
pub struct InvocationPlan;

impl InvocationPlan {
    pub fn build(config: &RunnerConfig, prompt: &str) -> CommandExecutionRequest {
        match config.runner.backend {
            Backend::Ollama => CommandExecutionRequest {
                program: config.ollama.program.clone(),
                args: vec![
                    "run".to_string(),
                    config.ollama.model.clone(),
                    prompt.to_string(),
                ],
                cwd: None,
                timeout: config.timeout(),
            },
            Backend::Script => CommandExecutionRequest {
                program: resolve_program(&config.script.program, &config.project_root),
                args: vec![
                    "-m".to_string(),
                    config.script.model_path.display().to_string(),
                    "-p".to_string(),
                    prompt.to_string(),
                    "-n".to_string(),
                    config.script.max_tokens.to_string(),
                    "-t".to_string(),
                    config.script.threads.to_string(),
                ],
                cwd: Some(config.project_root.clone()),
                timeout: config.timeout(),
            },
        }
    }
}

/// Relative paths such as `./main` are anchored at the project root; bare names go through PATH.
fn resolve_program(program: &str, project_root: &Path) -> String {
    let path = PathBuf::from(program);
    let has_separator = program.contains(std::path::MAIN_SEPARATOR) || program.contains('/');
    if path.is_relative() && has_separator {
        project_root.join(path).display().to_string()
    } else {
        program.to_string()
    }
}
