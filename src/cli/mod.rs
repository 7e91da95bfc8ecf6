pub mod args;
pub mod commands;

pub use args::RunArgs;
use clap::Parser;

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\n{all-args}\n";

#[derive(Parser, Debug)]
#[command(name = "prompt-runner")]
#[command(version = crate::VERSION)]
#[command(about = "Run a prompt through a local LLM runtime and print the result as JSON")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Prints exactly one JSON object on stdout: {\"success\", \"output\", \"error\", \"code\"}.\n\nExamples:\n    prompt-runner explain borrow checking\n    echo '{\"prompt\": \"hi\"}' | prompt-runner --input-format json\n    prompt-runner --backend script --project-root ~/llama.cpp --threads 8 write a haiku"
)]
pub struct Args {
    #[command(flatten)]
    pub run: RunArgs,
}

/// Execute one invocation and return the process exit status.
pub async fn run(args: Args) -> crate::Result<u8> {
    commands::run(args.run).await
}
