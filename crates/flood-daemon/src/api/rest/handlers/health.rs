//! Health and status handlers

use crate::api::rest::state::AppState;
use crate::error::ApiError;
use axum::{extract::State, http::Uri, Json};
use serde::{Deserialize, Serialize};

/// Root banner response
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

/// API root
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Flood Management API".to_string(),
    })
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
    pub script: String,
    pub script_present: bool,
    pub idle_workers: usize,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    let script = state.invoker.script_path();
    let script_present = tokio::fs::metadata(script).await.is_ok();

    Json(HealthCheckResponse {
        status: if script_present { "healthy" } else { "degraded" }.to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
        script: script.display().to_string(),
        script_present,
        idle_workers: state.invoker.available_permits(),
    })
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
