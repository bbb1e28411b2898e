//! CLI error types

use flood_map::{MapError, TransportError};
use flood_types::ArtifactError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("Failed to format output: {0}")]
    Output(#[from] serde_json::Error),

    /// The map controller ended in the errored state
    #[error("{0}")]
    Render(String),
}

pub type CliResult<T> = Result<T, CliError>;
