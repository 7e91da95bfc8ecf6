#![allow(clippy::result_large_err)]

use super::{RunnerConfig, CONFIG_FILE_NAME};
use crate::core::error::AppError;
use crate::core::types::{Backend, ErrorCategory, InputFormat};
use std::env;
use std::path::{Path, PathBuf};

pub const ENV_PROJECT_ROOT: &str = "PROMPT_RUNNER_PROJECT_ROOT";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config for a project root.
    /// An explicit config path must exist; otherwise {project_root}/prompt-runner.toml is used,
    /// then the user config directory, then built-in defaults.
    /// Environment variables override file values.
    pub fn load(project_root: &Path, explicit: Option<&Path>) -> Result<RunnerConfig, AppError> {
        let config_file = match explicit {
            Some(path) => {
                let resolved = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    project_root.join(path)
                };
                let loaded = Self::load_from_file(&resolved)?;
                if loaded.is_none() {
                    return Err(AppError::new(
                        ErrorCategory::ValidationError,
                        format!("Config file {} does not exist", resolved.display()),
                    )
                    .with_code("CFG-001"));
                }
                loaded
            }
            None => match Self::load_from_file(&project_root.join(CONFIG_FILE_NAME))? {
                Some(config) => Some(config),
                None => match Self::user_config_path() {
                    Some(path) => Self::load_from_file(&path)?,
                    None => None,
                },
            },
        };

        let mut config = config_file.unwrap_or_default();
        config.project_root = project_root.to_path_buf();

        Self::apply_env_overrides(&mut config);

        Ok(config)
    }

    /// Load config from specific file path
    /// Returns Ok(None) if file doesn't exist
    pub fn load_from_file(path: &Path) -> Result<Option<RunnerConfig>, AppError> {
        if !path.exists() {
            return Ok(None);
        }

        tracing::debug!(path = %path.display(), "loading runner config");

        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::new(
                ErrorCategory::IoError,
                format!("Failed to read config file {}: {}", path.display(), e),
            )
        })?;

        let config: RunnerConfig = toml::from_str(&content).map_err(|e| {
            AppError::new(
                ErrorCategory::ValidationError,
                format!("Failed to parse config file {}: {}", path.display(), e),
            )
            .with_code("CFG-002")
        })?;

        Ok(Some(config))
    }

    /// Resolve the project root: explicit value, then environment, then the current directory.
    pub fn resolve_project_root(explicit: Option<PathBuf>) -> Result<PathBuf, AppError> {
        if let Some(path) = explicit {
            return Ok(path);
        }
        if let Ok(path) = env::var(ENV_PROJECT_ROOT) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        env::current_dir().map_err(|e| {
            AppError::new(
                ErrorCategory::IoError,
                format!("Failed to determine current directory: {}", e),
            )
        })
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|dir| dir.join("prompt-runner").join("config.toml"))
    }

    /// Apply environment variable overrides to the configuration
    /// Environment variables take precedence over config file values
    fn apply_env_overrides(config: &mut RunnerConfig) {
        if let Ok(backend) = env::var("PROMPT_RUNNER_BACKEND") {
            if let Ok(backend) = backend.parse::<Backend>() {
                config.runner.backend = backend;
            }
        }

        if let Ok(format) = env::var("PROMPT_RUNNER_INPUT_FORMAT") {
            if let Ok(format) = format.parse::<InputFormat>() {
                config.runner.input_format = format;
            }
        }

        if let Ok(program) = env::var("PROMPT_RUNNER_OLLAMA_PROGRAM") {
            config.ollama.program = program;
        }

        if let Ok(model) = env::var("PROMPT_RUNNER_OLLAMA_MODEL") {
            config.ollama.model = model;
        }

        if let Ok(program) = env::var("PROMPT_RUNNER_SCRIPT_PROGRAM") {
            config.script.program = program;
        }

        if let Ok(model_path) = env::var("PROMPT_RUNNER_SCRIPT_MODEL_PATH") {
            config.script.model_path = PathBuf::from(model_path);
        }

        if let Ok(max_tokens) = env::var("PROMPT_RUNNER_SCRIPT_MAX_TOKENS") {
            if let Ok(max_tokens) = max_tokens.parse::<u32>() {
                config.script.max_tokens = max_tokens;
            }
        }

        if let Ok(threads) = env::var("PROMPT_RUNNER_SCRIPT_THREADS") {
            if let Ok(threads) = threads.parse::<u32>() {
                config.script.threads = threads;
            }
        }

        if let Ok(timeout) = env::var("PROMPT_RUNNER_TIMEOUT_SECONDS") {
            if let Ok(timeout) = timeout.parse::<u64>() {
                config.timeout_override = Some(timeout);
            }
        }
    }

    /// Get documentation for supported environment variables
    pub fn env_var_documentation() -> &'static [&'static str] {
        &[
            "PROMPT_RUNNER_PROJECT_ROOT - Directory holding prompt-runner.toml and the script backend's working directory",
            "PROMPT_RUNNER_BACKEND - Override backend (ollama or script)",
            "PROMPT_RUNNER_INPUT_FORMAT - Override stdin format (text or json)",
            "PROMPT_RUNNER_OLLAMA_PROGRAM - Override ollama executable (default: ollama)",
            "PROMPT_RUNNER_OLLAMA_MODEL - Override ollama model (default: codellama:7b-instruct)",
            "PROMPT_RUNNER_SCRIPT_PROGRAM - Override inference script (default: ./main)",
            "PROMPT_RUNNER_SCRIPT_MODEL_PATH - Override script model file",
            "PROMPT_RUNNER_SCRIPT_MAX_TOKENS - Override script token limit (default: 512)",
            "PROMPT_RUNNER_SCRIPT_THREADS - Override script thread count (default: 4)",
            "PROMPT_RUNNER_TIMEOUT_SECONDS - Override timeout of the active backend",
        ]
    }
}
