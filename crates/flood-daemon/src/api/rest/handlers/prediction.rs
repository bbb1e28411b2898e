//! Flood prediction handler

use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

/// Run the predictive computation and relay its artifact.
///
/// The body is the computation's stdout byte for byte; no request
/// parameters are read.
pub async fn flood_prediction(State(state): State<AppState>) -> ApiResult<Response> {
    let artifact = state.invoker.predict().await?;

    tracing::debug!(bytes = artifact.len(), "Relaying flood prediction");

    Ok(([(header::CONTENT_TYPE, "application/json")], artifact).into_response())
}
