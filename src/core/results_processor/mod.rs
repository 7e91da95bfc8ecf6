use crate::core::entities::InvocationResult;
use crate::core::noise_filter::NoiseFilter;
use crate::tools::CommandExecutionOutput;

/// Turns captured child output into the flat result record.
pub struct ResultsProcessor {
    filter: NoiseFilter,
    stderr_fallback: bool,
}

impl ResultsProcessor {
    pub fn new(filter: NoiseFilter, stderr_fallback: bool) -> Self {
        ResultsProcessor {
            filter,
            stderr_fallback,
        }
    }

    pub fn shape(&self, captured: &CommandExecutionOutput) -> InvocationResult {
        let stdout = String::from_utf8_lossy(&captured.stdout);
        let stderr = String::from_utf8_lossy(&captured.stderr);
        let stderr = stderr.trim();

        let mut output = stdout.trim().to_string();
        if output.is_empty() && !stderr.is_empty() && self.stderr_fallback {
            output = self.filter.filter(stderr).trim().to_string();
            tracing::debug!(
                kept_bytes = output.len(),
                "stdout empty, using filtered stderr as output"
            );
        }

        InvocationResult::completed(captured.exit_code, output, stderr)
    }
}

impl Default for ResultsProcessor {
    fn default() -> Self {
        ResultsProcessor::new(NoiseFilter::default(), true)
    }
}
