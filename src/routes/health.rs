use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::json;

use crate::server::AppState;

/// Health check endpoint handler.
///
/// Liveness only: answers without touching the database.
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/ping`
/// - **Response**: `{"status": "pong"}`
pub async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "status": "pong" }))
}

/// Readiness endpoint handler.
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/health`
///
/// # HTTP Status Codes
/// - **200 OK**: `{"status": "ok"}`, the store answered `SELECT 1`
/// - **503 Service Unavailable**: `{"status": "degraded"}`
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    match state.health.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "degraded" })))
        }
    }
}
