//! squirrel entry point.
//!
//! Host adapter for the cache agent: wires configuration, the SQLite store,
//! and the HTTP client together and drives the install/activate/fetch
//! lifecycle from the command line. Logging goes to stderr so `get` can
//! stream response bodies on stdout.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "squirrel", version, about = "Offline-first cache agent for a static asset bundle")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pre-cache the asset manifest, then activate the new generation
    Install,
    /// Delete every cache generation except the current one
    Activate,
    /// Fetch a URL through the cache-first interceptor
    Get { url: String },
    /// List cache generations and their entry counts
    Generations,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Install => commands::install().await,
        Command::Activate => commands::activate().await,
        Command::Get { url } => commands::get(&url).await,
        Command::Generations => commands::generations().await,
    }
}
