#![allow(clippy::result_large_err)]

use super::RunnerConfig;
use crate::core::error::AppError;
use crate::core::noise_filter::NoiseFilter;
use crate::core::types::{Backend, ErrorCategory};

pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration rules
    pub fn validate(config: &RunnerConfig) -> Result<(), AppError> {
        if config.program().trim().is_empty() {
            return Err(invalid(format!("{}.program cannot be empty", config.runner.backend)));
        }

        if config.timeout_seconds() == 0 {
            return Err(invalid(format!(
                "timeout for the {} backend must be greater than zero",
                config.runner.backend
            )));
        }

        match config.runner.backend {
            Backend::Ollama => {
                if config.ollama.model.trim().is_empty() {
                    return Err(invalid("ollama.model cannot be empty"));
                }
            }
            Backend::Script => {
                if config.script.model_path.as_os_str().is_empty() {
                    return Err(invalid("script.model_path cannot be empty"));
                }
                if config.script.max_tokens == 0 {
                    return Err(invalid("script.max_tokens must be greater than zero"));
                }
                if config.script.threads == 0 {
                    return Err(invalid("script.threads must be greater than zero"));
                }
                // The script runs inside the project root
                if !config.project_root.is_dir() {
                    return Err(invalid(format!(
                        "project root {} is not a directory",
                        config.project_root.display()
                    )));
                }
            }
        }

        NoiseFilter::new(&config.filter.patterns)
            .map_err(|e| invalid(format!("filter.patterns contains an invalid pattern: {}", e)))?;

        Ok(())
    }
}

fn invalid<T: Into<String>>(message: T) -> AppError {
    AppError::new(ErrorCategory::ValidationError, message).with_code("CFG-003")
}
