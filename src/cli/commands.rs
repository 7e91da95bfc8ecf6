use crate::{
    cli::args::RunArgs,
    core::{
        error::{self, AppError},
        prompt::NO_PROMPT_MESSAGE,
        ConfigLoader, ConfigValidator, InvocationResult, PromptReader, PromptRunner, RunnerConfig,
    },
    logging, Result,
};
use anyhow::Context;
use clap::error::ErrorKind;
use std::io::{self, Read, Write};
use std::path::Path;

/// Exit status when the result was produced by running the child, whatever it returned.
pub const EXIT_STATUS_INVOKED: u8 = 0;

/// Exit status when the run was rejected before any child was launched.
pub const EXIT_STATUS_REJECTED: u8 = 1;

/// Handles a single `prompt-runner` invocation reading stdin when no prompt words are given.
pub async fn run(args: RunArgs) -> Result<u8> {
    let stdin = io::stdin();
    run_with_input(args, stdin.lock(), io::stdout().lock()).await
}

/// Resolve config and prompt, run the child, and write the JSON result to `out`.
///
/// Only a failure to write the result itself is returned as an error.
pub async fn run_with_input<R: Read, W: Write>(args: RunArgs, input: R, out: W) -> Result<u8> {
    let project_root = match ConfigLoader::resolve_project_root(args.project_root.clone()) {
        Ok(root) => root,
        Err(err) => return reject(&err, out),
    };

    let _logging = match logging::init(&project_root, args.verbose) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("prompt-runner: logging disabled: {:#}", err);
            None
        }
    };

    let config = match load_config(&args, &project_root) {
        Ok(config) => config,
        Err(err) => {
            error::report(&err);
            return reject(&err, out);
        }
    };

    let prompt = match PromptReader::resolve(&args.prompt, input, config.runner.input_format) {
        Ok(prompt) => prompt,
        Err(err) => {
            error::report(&err);
            return reject(&err, out);
        }
    };
    if prompt.is_empty() {
        tracing::error!("{}", NO_PROMPT_MESSAGE);
        emit(&InvocationResult::rejected(NO_PROMPT_MESSAGE), out)?;
        return Ok(EXIT_STATUS_REJECTED);
    }

    let runner = match PromptRunner::new(config) {
        Ok(runner) => runner,
        Err(err) => {
            error::report(&err);
            return reject(&err, out);
        }
    };

    let result = runner.run(&prompt).await;
    emit(&result, out)?;
    Ok(EXIT_STATUS_INVOKED)
}

fn load_config(args: &RunArgs, project_root: &Path) -> std::result::Result<RunnerConfig, AppError> {
    let mut config = ConfigLoader::load(project_root, args.config.as_deref())?;
    args.apply_overrides(&mut config);
    ConfigValidator::validate(&config)?;
    tracing::debug!(
        backend = %config.runner.backend,
        input_format = %config.runner.input_format,
        program = config.program(),
        timeout_seconds = config.timeout_seconds(),
        project_root = %config.project_root.display(),
        "configuration resolved"
    );
    Ok(config)
}

fn reject<W: Write>(err: &AppError, out: W) -> Result<u8> {
    emit(&InvocationResult::rejected(err.message.clone()), out)?;
    Ok(EXIT_STATUS_REJECTED)
}

/// Report a command-line parse failure as a rejected result.
///
/// Help and version requests are printed by clap and exit the process.
pub fn reject_usage<W: Write>(err: clap::Error, out: W) -> Result<u8> {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => err.exit(),
        _ => {}
    }
    let _ = err.print();
    emit(&InvocationResult::rejected(usage_message(&err)), out)?;
    Ok(EXIT_STATUS_REJECTED)
}

fn usage_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default().trim();
    first.strip_prefix("error:").unwrap_or(first).trim().to_string()
}

fn emit<W: Write>(result: &InvocationResult, mut out: W) -> Result<()> {
    let line = result.to_json().context("failed to encode result")?;
    writeln!(out, "{}", line).context("failed to write result to stdout")?;
    out.flush().context("failed to flush stdout")?;
    Ok(())
}
