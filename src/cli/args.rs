use crate::core::config::RunnerConfig;
use crate::core::types::{Backend, InputFormat};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Prompt words, joined with single spaces (read from stdin when omitted)
    #[arg(
        value_name = "PROMPT",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        allow_negative_numbers = true
    )]
    pub prompt: Vec<String>,

    /// External command line to build (default: ollama)
    #[arg(long, value_enum, help_heading = "Backend")]
    pub backend: Option<Backend>,

    /// Executable for the selected backend
    #[arg(long, value_name = "PATH", help_heading = "Backend")]
    pub program: Option<String>,

    /// Model name passed to `ollama run`
    #[arg(long, value_name = "NAME", help_heading = "Backend")]
    pub model: Option<String>,

    /// Model file passed to the inference script with -m
    #[arg(long, value_name = "FILE", help_heading = "Backend")]
    pub model_path: Option<PathBuf>,

    /// Token limit passed to the inference script with -n
    #[arg(long, value_name = "N", help_heading = "Backend")]
    pub max_tokens: Option<u32>,

    /// Thread count passed to the inference script with -t
    #[arg(long, value_name = "N", help_heading = "Backend")]
    pub threads: Option<u32>,

    /// Wall-clock bound for the child, e.g. 90s, 3m, or plain seconds
    #[arg(long, value_name = "DURATION", value_parser = parse_timeout, help_heading = "Backend")]
    pub timeout: Option<Duration>,

    /// How stdin is read when no prompt words are given (default: text)
    #[arg(long, value_enum, help_heading = "Input")]
    pub input_format: Option<InputFormat>,

    /// Directory holding prompt-runner.toml; the script backend runs here (default: current directory)
    #[arg(long, value_name = "PATH", help_heading = "Configuration")]
    pub project_root: Option<PathBuf>,

    /// Path to custom config file (default: {project-root}/prompt-runner.toml)
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<PathBuf>,

    /// Log at debug level on stderr
    #[arg(short, long, help_heading = "Output Options")]
    pub verbose: bool,
}

impl RunArgs {
    /// Apply command-line overrides on top of file and environment values.
    pub fn apply_overrides(&self, config: &mut RunnerConfig) {
        if let Some(backend) = self.backend {
            config.runner.backend = backend;
        }
        if let Some(format) = self.input_format {
            config.runner.input_format = format;
        }
        if let Some(ref program) = self.program {
            config.set_program(program.clone());
        }
        if let Some(ref model) = self.model {
            config.ollama.model = model.clone();
        }
        if let Some(ref model_path) = self.model_path {
            config.script.model_path = model_path.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            config.script.max_tokens = max_tokens;
        }
        if let Some(threads) = self.threads {
            config.script.threads = threads;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_override = Some(timeout.as_secs());
        }
    }
}

/// Accept plain seconds or a humantime duration of at least one whole second.
pub fn parse_timeout(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    let duration = match value.parse::<u64>() {
        Ok(seconds) => Duration::from_secs(seconds),
        Err(_) => humantime::parse_duration(value)
            .map_err(|e| format!("invalid duration '{}': {}", value, e))?,
    };
    if duration.as_secs() == 0 {
        return Err("timeout must be at least one second".to_string());
    }
    if duration.subsec_nanos() != 0 {
        return Err("timeout must be a whole number of seconds".to_string());
    }
    Ok(duration)
}
