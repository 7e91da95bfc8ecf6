pub mod config;
pub mod entities;
pub mod error;
pub mod invocation;
pub mod noise_filter;
pub mod prompt;
pub mod results_processor;
pub mod runner;
pub mod types;

pub use config::{ConfigLoader, ConfigValidator, RunnerConfig};
pub use entities::InvocationResult;
pub use error::AppError;
pub use invocation::InvocationPlan;
pub use noise_filter::NoiseFilter;
pub use prompt::PromptReader;
pub use results_processor::ResultsProcessor;
pub use runner::PromptRunner;
pub use types::*;
