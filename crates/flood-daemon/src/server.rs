//! Server setup and lifecycle management

use crate::api::create_router;
use crate::api::rest::state::AppState;
use crate::config::DaemonConfig;
use crate::error::{DaemonError, DaemonResult};
use crate::invoker::PredictionInvoker;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Flood prediction server
pub struct Server {
    config: DaemonConfig,
    invoker: Arc<PredictionInvoker>,
}

impl Server {
    /// Create a new server with the given configuration
    pub fn new(config: DaemonConfig) -> DaemonResult<Self> {
        if config.predictor.max_concurrent == 0 {
            return Err(DaemonError::Config(
                "predictor.max_concurrent must be at least 1".to_string(),
            ));
        }

        let invoker = Arc::new(PredictionInvoker::new(&config.predictor));

        Ok(Self { config, invoker })
    }

    /// Run the server
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;

        let state = AppState::new(self.invoker.clone());
        let app = create_router(state, &self.config.server);

        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Flood daemon listening on {}", addr);
        tracing::info!(
            script = %self.invoker.script_path().display(),
            timeout_secs = ?self.invoker.timeout().map(|t| t.as_secs()),
            max_concurrent = self.config.predictor.max_concurrent,
            "Prediction script configured"
        );
        if tokio::fs::metadata(self.invoker.script_path()).await.is_err() {
            tracing::warn!(
                "Prediction script {} does not exist; requests will return 404",
                self.invoker.script_path().display()
            );
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("Flood daemon shutting down");

        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install signal handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
