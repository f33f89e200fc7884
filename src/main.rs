//! Entry point for shopkeep, a terminal shopping assistant.
//!
//! This binary loads environment variables, initialises logging, parses CLI
//! arguments via [`cli`], and dispatches to the appropriate subcommand handler.

mod agent;
mod catalog;
mod chat;
mod cli;
mod config;
mod constants;
mod conversation;
mod format;
mod message;
mod orchestrator;
mod output;
mod provider;
mod tools;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Runs the shopkeep CLI.
///
/// Loads `.env` files (silently ignored if absent), sends logs to stderr
/// filtered by `RUST_LOG` (default `warn`), then dispatches the chosen
/// subcommand via [`cli::run`].
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::parse();
    cli::run(cli).await
}
