//! Flood Daemon - prediction delivery service
//!
//! The flood daemon provides:
//! - `GET /flood-prediction` and `GET /api/flood-prediction`, relaying the
//!   artifact produced by the external predictive computation
//! - `GET /health` for liveness and script presence

use clap::Parser;
use flood_daemon::config::DaemonConfig;
use flood_daemon::error::{DaemonError, DaemonResult};
use flood_daemon::server::Server;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Flood Daemon CLI
#[derive(Parser)]
#[command(name = "floodd")]
#[command(about = "Flood Daemon - Flood prediction delivery service", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "FLOOD_CONFIG")]
    config: Option<String>,

    /// Listen address (overrides the configuration file)
    #[arg(short, long, env = "FLOOD_LISTEN_ADDR")]
    listen: Option<String>,

    /// Prediction script path (overrides the configuration file)
    #[arg(short, long, env = "FLOOD_SCRIPT")]
    script: Option<PathBuf>,

    /// Log level (overrides the configuration file)
    #[arg(long, env = "FLOOD_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "FLOOD_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = DaemonConfig::load(cli.config.as_deref())
        .map_err(|e| DaemonError::Config(e.to_string()))?;

    // Override with CLI args
    if let Some(listen) = &cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| DaemonError::Config(format!("Invalid listen address: {}", e)))?;
    }
    if let Some(script) = cli.script {
        config.predictor.script_path = script;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.logging.json |= cli.json;

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    println!(
        r#"
  Flood Management API
  Version: {}
  Script: {}
  Listening: {}
"#,
        env!("CARGO_PKG_VERSION"),
        config.predictor.resolved_script_path().display(),
        config.server.listen_addr
    );

    let server = Server::new(config)?;
    server.run().await
}
