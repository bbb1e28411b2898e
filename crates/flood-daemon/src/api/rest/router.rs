//! API Router configuration

use super::handlers;
use super::state::AppState;
use crate::config::ServerConfig;
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use flood_types::{API_PREDICTION_PATH, PREDICTION_PATH};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        // Prediction, under both the service path and the client-facing path
        .route(PREDICTION_PATH, get(handlers::flood_prediction))
        .route(API_PREDICTION_PATH, get(handlers::flood_prediction))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http());

    if server.enable_cors {
        router = router.layer(cors_layer(&server.cors_origins));
    }

    router.with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin: {}", err);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PredictorConfig;
    use crate::invoker::PredictionInvoker;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use flood_types::ErrorBody;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_router(script_path: PathBuf) -> Router {
        let invoker = PredictionInvoker::new(&PredictorConfig {
            script_path,
            interpreter: "sh".to_string(),
            working_dir: String::new(),
            timeout_secs: 10,
            max_concurrent: 2,
        });
        create_router(AppState::new(Arc::new(invoker)), &ServerConfig::default())
    }

    fn router_with_script(dir: &TempDir, body: &str) -> Router {
        let path = dir.path().join("predict.sh");
        std::fs::write(&path, body).unwrap();
        test_router(path)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, bytes.to_vec())
    }

    #[tokio::test]
    async fn root_returns_banner() {
        let dir = TempDir::new().unwrap();
        let (status, _, body) = get(test_router(dir.path().join("none.py")), "/").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Flood Management API");
    }

    #[tokio::test]
    async fn missing_script_returns_404_with_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("flood_model/predict_flood.py");
        let (status, _, body) =
            get(test_router(missing.clone()), "/flood-prediction").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert!(json.error.contains(&missing.display().to_string()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn success_relays_exact_body() {
        let dir = TempDir::new().unwrap();
        let artifact = r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"riskLevel":"high","warning":"Evacuate"},"geometry":{"type":"Polygon","coordinates":[[[80.2,13.0],[80.25,13.0],[80.25,13.05],[80.2,13.0]]]}}]}"#;
        let app = router_with_script(&dir, &format!("printf '%s' '{}'\n", artifact));

        for path in ["/flood-prediction", "/api/flood-prediction"] {
            let (status, content_type, body) = get(app.clone(), path).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(content_type.as_deref(), Some("application/json"));
            assert_eq!(body, artifact.as_bytes());
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_script_returns_500_with_details() {
        let dir = TempDir::new().unwrap();
        let app = router_with_script(&dir, "printf 'No module named rasterio\\n' >&2\nexit 1\n");

        let (status, _, body) = get(app, "/api/flood-prediction").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.error, "Prediction script execution failed.");
        assert_eq!(json.details.as_deref(), Some("No module named rasterio\n"));
        assert_eq!(json.raw_output, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn invalid_output_returns_500_with_raw_output() {
        let dir = TempDir::new().unwrap();
        let app = router_with_script(&dir, "printf 'Processing flood prediction map'\n");

        let (status, _, body) = get(app, "/flood-prediction").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.error, "Invalid JSON output from script.");
        assert_eq!(json.raw_output.as_deref(), Some("Processing flood prediction map"));
        assert_eq!(json.details, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn every_request_reruns_the_script() {
        let dir = TempDir::new().unwrap();
        let counter = dir.path().join("runs");
        let app = router_with_script(
            &dir,
            &format!("echo run >> '{}'\nprintf '{{}}'\n", counter.display()),
        );

        for _ in 0..3 {
            let (status, _, _) = get(app.clone(), "/flood-prediction").await;
            assert_eq!(status, StatusCode::OK);
        }
        let runs = std::fs::read_to_string(&counter).unwrap();
        assert_eq!(runs.lines().count(), 3);
    }

    #[tokio::test]
    async fn health_reports_missing_script() {
        let dir = TempDir::new().unwrap();
        let (status, _, body) = get(test_router(dir.path().join("none.py")), "/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: handlers::HealthCheckResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.status, "degraded");
        assert!(!json.script_present);
        assert_eq!(json.idle_workers, 2);
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let dir = TempDir::new().unwrap();
        let (status, _, body) = get(test_router(dir.path().join("none.py")), "/reports").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.error, "Not found: /reports");
    }
}
