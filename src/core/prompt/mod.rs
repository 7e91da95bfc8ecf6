#![allow(clippy::result_large_err)]

use crate::core::error::AppError;
use crate::core::types::{ErrorCategory, InputFormat};
use serde::Deserialize;
use std::io::Read;

/// Message reported when neither arguments nor stdin carry a prompt.
pub const NO_PROMPT_MESSAGE: &str = "No prompt provided";

/// Stdin payload accepted in JSON input mode.
#[derive(Debug, Deserialize)]
struct PromptEnvelope {
    prompt: String,
}

/// Resolves the prompt text from command-line words or standard input.
pub struct PromptReader;

impl PromptReader {
    /// Join positional words, or read `input` to the end when there are none.
    /// The returned prompt is trimmed and may be empty.
    pub fn resolve<R: Read>(
        words: &[String],
        input: R,
        format: InputFormat,
    ) -> Result<String, AppError> {
        if !words.is_empty() {
            return Ok(Self::from_words(words));
        }
        let raw = Self::read_all(input)?;
        Ok(match format {
            InputFormat::Text => raw.trim().to_string(),
            InputFormat::Json => Self::from_json(&raw),
        })
    }

    pub fn from_words(words: &[String]) -> String {
        words.join(" ").trim().to_string()
    }

    /// Extract the `prompt` field; anything unparseable yields an empty prompt.
    pub fn from_json(raw: &str) -> String {
        match serde_json::from_str::<PromptEnvelope>(raw) {
            Ok(envelope) => envelope.prompt.trim().to_string(),
            Err(err) => {
                tracing::debug!(error = %err, "stdin is not a prompt envelope");
                String::new()
            }
        }
    }

    fn read_all<R: Read>(mut input: R) -> Result<String, AppError> {
        let mut raw = String::new();
        input.read_to_string(&mut raw).map_err(|e| {
            AppError::new(
                ErrorCategory::IoError,
                format!("Failed to read prompt from stdin: {}", e),
            )
            .with_code("PROMPT-001")
        })?;
        Ok(raw)
    }
}
