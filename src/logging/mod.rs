pub mod config;
pub mod layers;

pub use layers::console::ConsoleOutput;

use crate::logging::config::LoggingConfig;
use crate::logging::layers::{console, file};
use crate::Result;
use anyhow::{anyhow, Context};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::Registry;

static LOGGER_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Guards that keep logging sinks active for the duration of the invocation.
pub struct LoggingGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// Initialize the logging framework for one invocation rooted at `project_root`.
///
/// Level precedence: `--verbose` forces `debug`, then `RUST_LOG`, then the configured default.
/// Console output always goes to stderr (or nowhere) so stdout only carries the result.
/// Errors when invoked more than once per process.
pub fn init(project_root: &Path, verbose: bool) -> Result<LoggingGuard> {
    if LOGGER_INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Err(anyhow!("logging already initialized"));
    }

    let config = LoggingConfig::load(Some(project_root))?;

    let env_filter = if verbose {
        EnvFilter::try_new("debug")
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.default_level))
    }
    .context("failed to configure tracing level")?;

    let log_file_path = file::log_file_path(&config, project_root)?;
    type BaseRegistry = Registry;
    type FileSubscriber = file::FileLayerStack<BaseRegistry>;

    let (file_layer, file_guard) =
        file::file_layer::<BaseRegistry>(&log_file_path, config.enable_file)?;

    let subscriber = tracing_subscriber::registry().with(file_layer);

    let console_layer = console::console_layer::<FileSubscriber>(config.console_output);
    let subscriber = subscriber.with(console_layer);

    subscriber
        .with(env_filter)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {}", err))?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
