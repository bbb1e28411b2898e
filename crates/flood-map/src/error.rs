//! Map client error types

use crate::controller::RenderState;
use flood_types::ArtifactError;
use thiserror::Error;

/// Failure to obtain a prediction from the service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// Non-200 response. The message is the server's `error` text when it sent one.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Connection, DNS or timeout failure
    #[error("{0}")]
    Network(String),

    /// 200 response whose body is not JSON
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure to turn an artifact into a zone overlay.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("Invalid GeoJSON object at feature {index}: {reason}")]
    InvalidFeature { index: usize, reason: String },

    #[error("Invalid geometry at feature {index}: {source}")]
    Geometry {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// No zone has a position to fit the view to
    #[error("Bounds are not valid.")]
    EmptyExtent,
}

/// Controller misuse.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("Map controller has already been started")]
    AlreadyStarted,

    #[error("Map is not ready (state: {0})")]
    NotReady(RenderState),

    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type MapResult<T> = Result<T, MapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_displays_message_only() {
        let err = TransportError::Status {
            status: 404,
            message: "Prediction script not found at /srv/predict_flood.py".to_string(),
        };
        assert_eq!(err.to_string(), "Prediction script not found at /srv/predict_flood.py");
        assert_eq!(err.status(), Some(404));
        assert_eq!(TransportError::Network("refused".into()).status(), None);
    }

    #[test]
    fn test_artifact_shape_error_passes_through() {
        let err = RenderError::from(ArtifactError::Shape("missing type".to_string()));
        assert_eq!(err.to_string(), "Invalid GeoJSON object: missing type");
    }
}
