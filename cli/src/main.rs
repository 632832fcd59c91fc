//! `fixbot` entry point.
//!
//! One invocation handles one GitHub event and exits: 0 for a completed
//! dispatch and for clean no-op skips, 1 for any failure. Failures are
//! logged to stderr; they are never posted back to the pull request.

use clap::{Parser, Subcommand};

use fixbot_cli::pipeline;
use fixbot_core::{BotConfig, RunOutcome};

#[derive(Parser)]
#[command(name = "fixbot", about = "CI bot that routes completion replies to PR actions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// React to a failed workflow run (workflow_run event).
    Fix,
    /// React to an issue comment mentioning the bot (issue_comment event).
    Comment,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = BotConfig::from_env()?;

    let outcome = match cli.command {
        Command::Fix => pipeline::run_fix(&config).await?,
        Command::Comment => pipeline::run_comment(&config).await?,
    };

    match outcome {
        RunOutcome::Dispatched(kind) => tracing::info!(%kind, "dispatched"),
        RunOutcome::Skipped(reason) => tracing::info!(%reason, "skipped"),
    }
    Ok(())
}
