//! Error types for flood-daemon

use crate::invoker::InvokeError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use flood_types::ErrorBody;
use thiserror::Error;

/// Daemon-level errors
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server startup error
    #[error("Server error: {0}")]
    Server(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// API-specific errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Prediction failure, mapped one-to-one onto a response
    #[error(transparent)]
    Prediction(#[from] InvokeError),

    /// Unknown route
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Prediction(err) => match err {
                InvokeError::NotFound { .. } => StatusCode::NOT_FOUND,
                InvokeError::ExecutionFailure { .. }
                | InvokeError::InvalidOutput { .. }
                | InvokeError::Spawn { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                InvokeError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                InvokeError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            },
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::Prediction(err) => match err {
                InvokeError::ExecutionFailure { stderr, .. } => {
                    ErrorBody::new(err.to_string()).with_details(stderr.clone())
                }
                InvokeError::InvalidOutput { raw_output } => {
                    ErrorBody::new(err.to_string()).with_raw_output(raw_output.clone())
                }
                InvokeError::Spawn { .. } => {
                    ErrorBody::new("Prediction script execution failed.").with_details(err.to_string())
                }
                _ => ErrorBody::new(err.to_string()),
            },
            ApiError::NotFound(_) => ErrorBody::new(self.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Prediction request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Prediction request rejected");
        }

        (status, Json(self.body())).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;
