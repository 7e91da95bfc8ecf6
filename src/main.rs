use clap::Parser;
use prompt_runner::cli::{self, Args};
use std::io;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let status = match Args::try_parse() {
        Ok(args) => cli::run(args).await?,
        Err(err) => cli::commands::reject_usage(err, io::stdout().lock())?,
    };
    Ok(ExitCode::from(status))
}
