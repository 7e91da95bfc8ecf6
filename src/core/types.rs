use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    ValidationError,
    ExecutableNotFound,
    ToolExecutionError,
    TimeoutError,
    SerializationError,
    IoError,
    InternalError,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Error severity enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Error,
    Warning,
}

/// External command line family used to run the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// `ollama run <model> <prompt>`
    #[default]
    Ollama,
    /// Inference script driven with `-m/-p/-n/-t` flags
    Script,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Ollama => write!(f, "ollama"),
            Backend::Script => write!(f, "script"),
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "ollama" => Ok(Backend::Ollama),
            "script" => Ok(Backend::Script),
            _ => Err(format!(
                "invalid backend '{}'; supported values are ollama, script",
                value
            )),
        }
    }
}

/// How a prompt read from standard input is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// The whole stream is the prompt
    #[default]
    Text,
    /// A JSON object carrying a `prompt` field
    Json,
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Text => write!(f, "text"),
            InputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "text" => Ok(InputFormat::Text),
            "json" => Ok(InputFormat::Json),
            _ => Err(format!(
                "invalid input format '{}'; supported values are text, json",
                value
            )),
        }
    }
}
