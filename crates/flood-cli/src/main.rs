//! Flood CLI - Command-line interface for the flood prediction service
//!
//! This CLI lets operators:
//! - Check that the prediction service is reachable and has its script
//! - Fetch the current prediction and list its zones
//! - Render the prediction headlessly and inspect the resulting map state

use clap::{Parser, Subcommand};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod output;

use commands::{predict, render, status};
use error::CliResult;
use flood_map::{PredictionClient, DEFAULT_BASE_URL};

/// Flood CLI application
#[derive(Parser)]
#[command(name = "flood")]
#[command(about = "Flood - flood prediction service CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Prediction service endpoint
    #[arg(short, long, env = "FLOOD_ENDPOINT", default_value = DEFAULT_BASE_URL)]
    endpoint: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table")]
    output: output::OutputFormat,

    /// Request timeout in seconds (no timeout when omitted)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Check service connectivity
    Status,

    /// Fetch the current prediction and list its zones
    Predict(predict::PredictArgs),

    /// Render the current prediction on a headless map and report the result
    Render,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    if let Err(e) = run(cli).await {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let client = match cli.timeout {
        Some(secs) => PredictionClient::with_timeout(&cli.endpoint, Duration::from_secs(secs))?,
        None => PredictionClient::new(&cli.endpoint)?,
    };
    tracing::debug!(endpoint = %client.base_url(), "Using flood prediction service");

    match cli.command {
        Commands::Status => status::execute(&client, cli.output).await,
        Commands::Predict(args) => predict::execute(args, &client, cli.output).await,
        Commands::Render => render::execute(client, cli.output).await,
    }
}
