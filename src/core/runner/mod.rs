#![allow(clippy::result_large_err)]

use crate::core::config::RunnerConfig;
use crate::core::entities::InvocationResult;
use crate::core::error::{self, AppError};
use crate::core::invocation::InvocationPlan;
use crate::core::noise_filter::NoiseFilter;
use crate::core::results_processor::ResultsProcessor;
use crate::core::types::ErrorCategory;
use crate::tools::{CommandRunner, TokioCommandRunner};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Message reported when `run` is handed a blank prompt.
pub const EMPTY_PROMPT_MESSAGE: &str = "Empty prompt";

/// Runs one prompt through the configured backend and shapes the outcome.
pub struct PromptRunner {
    config: RunnerConfig,
    processor: ResultsProcessor,
    runner: Arc<dyn CommandRunner>,
}

impl PromptRunner {
    pub fn new(config: RunnerConfig) -> Result<Self, AppError> {
        Self::with_runner(config, Arc::new(TokioCommandRunner))
    }

    pub fn with_runner(
        config: RunnerConfig,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Self, AppError> {
        let filter = NoiseFilter::new(&config.filter.patterns).map_err(|e| {
            AppError::new(
                ErrorCategory::ValidationError,
                format!("filter.patterns contains an invalid pattern: {}", e),
            )
        })?;
        let processor = ResultsProcessor::new(filter, config.runner.stderr_fallback);
        Ok(PromptRunner {
            config,
            processor,
            runner,
        })
    }

    /// Launch the child for `prompt`; every failure is folded into the result.
    pub async fn run(&self, prompt: &str) -> InvocationResult {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            tracing::warn!("refusing to run an empty prompt");
            return InvocationResult::rejected(EMPTY_PROMPT_MESSAGE);
        }

        let request = InvocationPlan::build(&self.config, prompt);
        let span = tracing::info_span!(
            "invocation",
            invocation_id = %uuid::Uuid::new_v4(),
            backend = %self.config.runner.backend,
            program = %request.program,
        );

        async {
            tracing::debug!(command = %request.display(), "launching inference process");
            let started = Instant::now();
            match self.runner.run(&request).await {
                Ok(captured) => {
                    let result = self.processor.shape(&captured);
                    tracing::info!(
                        code = result.code,
                        duration_ms = started.elapsed().as_millis() as u64,
                        "inference process finished"
                    );
                    result
                }
                Err(err) => {
                    let err = AppError::from(err).with_context("program", request.program.clone());
                    error::report(&err);
                    InvocationResult::from_error(&err)
                }
            }
        }
        .instrument(span)
        .await
    }
}
