pub mod loader;
pub mod validation;

pub use loader::{ConfigLoader, ENV_PROJECT_ROOT};
pub use validation::ConfigValidator;

use crate::core::noise_filter::DEFAULT_NOISE_PATTERNS;
use crate::core::types::{Backend, InputFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Name of the optional configuration file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "prompt-runner.toml";

/// Runner configuration loaded from prompt-runner.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunnerConfig {
    /// Directory the script backend runs in; never read from the file
    #[serde(skip)]
    pub project_root: PathBuf,

    /// Backend and input selection
    #[serde(default)]
    pub runner: RunnerSection,

    /// Ollama backend configuration
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Inference script backend configuration
    #[serde(default)]
    pub script: ScriptConfig,

    /// Stderr noise filter configuration
    #[serde(default)]
    pub filter: FilterConfig,

    /// Timeout from the environment or command line; applies to whichever backend is active
    #[serde(skip)]
    pub timeout_override: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerSection {
    #[serde(default)]
    pub backend: Backend,

    #[serde(default)]
    pub input_format: InputFormat,

    /// Use filtered stderr as output when stdout is empty
    #[serde(default = "default_stderr_fallback")]
    pub stderr_fallback: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_program")]
    pub program: String,

    #[serde(default = "default_ollama_model")]
    pub model: String,

    #[serde(default = "default_ollama_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptConfig {
    #[serde(default = "default_script_program")]
    pub program: String,

    /// Model file, relative paths resolve against the project root
    #[serde(default = "default_script_model_path")]
    pub model_path: PathBuf,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_threads")]
    pub threads: u32,

    #[serde(default = "default_script_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Regular expressions marking a stderr line as noise
    #[serde(default = "default_noise_patterns")]
    pub patterns: Vec<String>,
}

fn default_stderr_fallback() -> bool {
    true
}

fn default_ollama_program() -> String {
    "ollama".to_string()
}

fn default_ollama_model() -> String {
    "codellama:7b-instruct".to_string()
}

fn default_ollama_timeout_seconds() -> u64 {
    120
}

fn default_script_program() -> String {
    "./main".to_string()
}

fn default_script_model_path() -> PathBuf {
    PathBuf::from("models/7B/ggml-model-q4_0.gguf")
}

fn default_max_tokens() -> u32 {
    512
}

fn default_threads() -> u32 {
    4
}

fn default_script_timeout_seconds() -> u64 {
    180
}

fn default_noise_patterns() -> Vec<String> {
    DEFAULT_NOISE_PATTERNS.iter().map(|p| p.to_string()).collect()
}

impl Default for RunnerSection {
    fn default() -> Self {
        RunnerSection {
            backend: Backend::default(),
            input_format: InputFormat::default(),
            stderr_fallback: default_stderr_fallback(),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        OllamaConfig {
            program: default_ollama_program(),
            model: default_ollama_model(),
            timeout_seconds: default_ollama_timeout_seconds(),
        }
    }
}

impl Default for ScriptConfig {
    fn default() -> Self {
        ScriptConfig {
            program: default_script_program(),
            model_path: default_script_model_path(),
            max_tokens: default_max_tokens(),
            threads: default_threads(),
            timeout_seconds: default_script_timeout_seconds(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            patterns: default_noise_patterns(),
        }
    }
}

impl RunnerConfig {
    pub fn with_project_root(project_root: PathBuf) -> Self {
        RunnerConfig {
            project_root,
            ..Default::default()
        }
    }

    /// Wall-clock bound for the active backend.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds())
    }

    pub fn timeout_seconds(&self) -> u64 {
        if let Some(seconds) = self.timeout_override {
            return seconds;
        }
        match self.runner.backend {
            Backend::Ollama => self.ollama.timeout_seconds,
            Backend::Script => self.script.timeout_seconds,
        }
    }

    /// Executable configured for the active backend.
    pub fn program(&self) -> &str {
        match self.runner.backend {
            Backend::Ollama => &self.ollama.program,
            Backend::Script => &self.script.program,
        }
    }

    pub fn set_program(&mut self, program: String) {
        match self.runner.backend {
            Backend::Ollama => self.ollama.program = program,
            Backend::Script => self.script.program = program,
        }
    }
}
