use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tubesweep_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "tubesweep")]
#[command(author, version, about = "Remove kids-targeted videos from your YouTube watch history")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate with the OAuth device flow and save the token
    Auth,
    /// Scan the watch history and remove kids-targeted videos
    Clean {
        /// Time window to scan, e.g. 1h, 3h, 12h, 1d
        #[arg(long, value_name = "DURATION")]
        since: String,
        /// Print what would be removed without making any changes
        #[arg(long)]
        dry_run: bool,
    },
    /// Revoke the token server-side and delete the local credential file
    Revoke,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    match cli.command {
        Commands::Auth => commands::auth::run(&config).await,
        Commands::Clean { since, dry_run } => commands::clean::run(&config, &since, dry_run).await,
        Commands::Revoke => commands::revoke::run(&config).await,
    }
}
