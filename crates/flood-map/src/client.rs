//! HTTP client for the flood prediction service

use crate::error::TransportError;
use async_trait::async_trait;
use flood_types::{ErrorBody, PredictionArtifact, API_PREDICTION_PATH};
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

/// Default service address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Anything that can produce a prediction artifact.
#[async_trait]
pub trait PredictionSource: Send + Sync {
    async fn fetch_prediction(&self) -> Result<PredictionArtifact, TransportError>;
}

/// Service health as reported by `GET /health`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceStatus {
    pub status: String,
    pub version: String,
    pub uptime: String,
    pub script: String,
    pub script_present: bool,
    pub idle_workers: usize,
}

/// HTTP client for the prediction service
#[derive(Debug, Clone)]
pub struct PredictionClient {
    client: Client,
    base_url: String,
}

impl PredictionClient {
    /// Create a client with no request timeout.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::build(base_url, None)
    }

    /// Create a client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        Self::build(base_url, Some(timeout))
    }

    fn build(base_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn prediction_url(&self) -> String {
        format!("{}{}", self.base_url, API_PREDICTION_PATH)
    }

    /// Check service health
    pub async fn health(&self) -> Result<ServiceStatus, TransportError> {
        let bytes = self.get_bytes("/health").await?;
        decode(&bytes)
    }

    /// Fetch the current prediction. Every call reaches the service.
    pub async fn prediction(&self) -> Result<PredictionArtifact, TransportError> {
        let bytes = self.get_bytes(API_PREDICTION_PATH).await?;
        let document: serde_json::Value = decode(&bytes)?;
        Ok(PredictionArtifact::from_value(document))
    }

    async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if status == StatusCode::OK {
            Ok(body.to_vec())
        } else {
            Err(status_error(status, &body))
        }
    }
}

#[async_trait]
impl PredictionSource for PredictionClient {
    async fn fetch_prediction(&self) -> Result<PredictionArtifact, TransportError> {
        self.prediction().await
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, TransportError> {
    serde_json::from_slice(bytes).map_err(|e| TransportError::Decode(e.to_string()))
}

/// Prefer the server's own `error` text over a generic status message.
fn status_error(status: StatusCode, body: &[u8]) -> TransportError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| format!("Request failed with status code {}", status.as_u16()));

    TransportError::Status {
        status: status.as_u16(),
        message,
    }
}
