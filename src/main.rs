//! Itinera - travel itinerary client
//!
#![doc = "Main entry point for the Itinera command-line client."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use itinera::cli::Cli;
use itinera::commands;
use itinera::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose, cli.json_logs);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    tracing::debug!(command = ?cli.command, "Running command");
    commands::run(cli, config).await
}

/// Initialize tracing/logging
///
/// `RUST_LOG` wins when set; otherwise `itinera=info`, or `itinera=debug`
/// with `--verbose`.
fn init_tracing(verbose: bool, json: bool) {
    let default_directive = if verbose { "itinera=debug" } else { "itinera=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
