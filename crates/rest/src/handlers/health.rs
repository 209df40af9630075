//! Health check endpoint handlers.
//!
//! Provides liveness and readiness endpoints for monitoring and load balancers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bookland_persistence::core::RecordStorage;
use tracing::{debug, warn};

use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET [base]/health`
///
/// # Response
///
/// - `200 OK` - Server is up
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: RecordStorage + Send + Sync,
{
    debug!("Processing health check request");

    let health_response = serde_json::json!({
        "status": "healthy",
        "backend": state.storage().backend_name(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    (StatusCode::OK, Json(health_response)).into_response()
}

/// Handler for the readiness probe.
///
/// Counts the records of every exposed resource to prove storage answers.
///
/// # HTTP Request
///
/// `GET [base]/_readiness`
///
/// # Response
///
/// - `200 OK` - Storage is reachable, with per-resource counts
/// - `503 Service Unavailable` - Storage failed
pub async fn readiness_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: RecordStorage + Send + Sync,
{
    debug!("Processing readiness check request");

    let mut counts = serde_json::Map::new();
    for name in state.registry().names() {
        match state.storage().count(name).await {
            Ok(count) => {
                counts.insert(name.to_string(), count.into());
            }
            Err(e) => {
                warn!(resource = name, error = %e, "Readiness check failed");
                let body = serde_json::json!({
                    "status": "unavailable",
                    "backend": state.storage().backend_name(),
                });
                return (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
            }
        }
    }

    let response = serde_json::json!({
        "status": "ready",
        "backend": state.storage().backend_name(),
        "records": counts,
    });

    (StatusCode::OK, Json(response)).into_response()
}
