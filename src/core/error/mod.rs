use crate::core::types::{ErrorCategory, ErrorSeverity};
use crate::tools::ExecutionError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Result code reported when the external executable cannot be found.
pub const EXIT_CODE_NOT_FOUND: i32 = 127;

/// Result code reported for every failure raised by the runner itself.
pub const EXIT_CODE_INTERNAL: i32 = 1;

#[derive(Debug)]
pub struct AppError {
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    pub code: String,
    pub message: String,
    pub context: HashMap<String, String>,
    pub occurred_at: DateTime<Utc>,
    pub source: Option<anyhow::Error>,
}

impl AppError {
    pub fn new<T: Into<String>>(category: ErrorCategory, message: T) -> Self {
        let severity = match category {
            ErrorCategory::TimeoutError => ErrorSeverity::Warning,
            ErrorCategory::ValidationError
            | ErrorCategory::ExecutableNotFound
            | ErrorCategory::ToolExecutionError
            | ErrorCategory::SerializationError
            | ErrorCategory::IoError
            | ErrorCategory::InternalError => ErrorSeverity::Error,
        };
        AppError {
            category,
            severity,
            code: format!("ERR-{}", uuid::Uuid::new_v4()),
            message: message.into(),
            context: HashMap::new(),
            occurred_at: Utc::now(),
            source: None,
        }
    }

    pub fn with_context<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn with_code<T: Into<String>>(mut self, code: T) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    pub fn severity(&self) -> ErrorSeverity {
        self.severity
    }

    /// The `code` value reported in the JSON result for this failure.
    pub fn exit_code(&self) -> i32 {
        match self.category {
            ErrorCategory::ExecutableNotFound => EXIT_CODE_NOT_FOUND,
            _ => EXIT_CODE_INTERNAL,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.category, self.message)?;
        if !self.context.is_empty() {
            write!(f, " (Context: {:?})", self.context)?;
        }
        if let Some(ref source) = self.source {
            write!(f, "\nCaused by: {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::new(ErrorCategory::InternalError, format!("{:#}", e))
            .with_code("ANYHOW_ERROR")
            .with_source(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::new(ErrorCategory::IoError, e.to_string())
            .with_code("IO_ERROR")
            .with_source(anyhow::anyhow!(e))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::new(ErrorCategory::SerializationError, e.to_string())
            .with_code("SERDE_ERROR")
            .with_source(anyhow::anyhow!(e))
    }
}

impl From<ExecutionError> for AppError {
    fn from(e: ExecutionError) -> Self {
        let (category, code) = match &e {
            ExecutionError::NotFound { .. } => (ErrorCategory::ExecutableNotFound, "EXEC-001"),
            ExecutionError::Timeout { .. } => (ErrorCategory::TimeoutError, "EXEC-002"),
            ExecutionError::Spawn { .. } => (ErrorCategory::ToolExecutionError, "EXEC-003"),
            ExecutionError::Wait { .. } => (ErrorCategory::ToolExecutionError, "EXEC-004"),
        };
        AppError::new(category, e.to_string())
            .with_code(code)
            .with_source(anyhow::Error::new(e))
    }
}

/// Log an error through tracing at a level matching its severity.
pub fn report(error: &AppError) {
    match error.severity() {
        ErrorSeverity::Error => tracing::error!(
            code = %error.code,
            category = %error.category,
            occurred_at = %error.occurred_at.to_rfc3339(),
            context = ?error.context,
            "{}",
            error.message
        ),
        ErrorSeverity::Warning => tracing::warn!(
            code = %error.code,
            category = %error.category,
            context = ?error.context,
            "{}",
            error.message
        ),
    }
}
