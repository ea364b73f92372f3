//! Binary crate for the `aerodex` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments into facade requests
//! - Interactive configuration
//! - Printing the JSON reply the chat plugin would receive

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();

    // Logs go to stderr so stdout stays valid JSON.
    let default_level = if cmd.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    cmd.run().await
}
