use crate::core::error::{AppError, EXIT_CODE_INTERNAL};
use serde::{Deserialize, Serialize};

/// Flat result record written to stdout once per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResult {
    pub success: bool,
    pub output: String,
    pub error: String,
    pub code: i32,
}

impl InvocationResult {
    /// Result for a child process that ran to completion.
    pub fn completed<O: Into<String>, E: Into<String>>(code: i32, output: O, error: E) -> Self {
        InvocationResult {
            success: code == 0,
            output: output.into(),
            error: error.into(),
            code,
        }
    }

    /// Result for a failure raised before or around the child process.
    pub fn failure<T: Into<String>>(message: T, code: i32) -> Self {
        InvocationResult {
            success: false,
            output: String::new(),
            error: message.into(),
            code,
        }
    }

    /// Result for a prompt that was rejected before anything was launched.
    pub fn rejected<T: Into<String>>(message: T) -> Self {
        Self::failure(message, EXIT_CODE_INTERNAL)
    }

    pub fn from_error(error: &AppError) -> Self {
        Self::failure(error.message.clone(), error.exit_code())
    }

    /// Serialize as a single JSON line.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
