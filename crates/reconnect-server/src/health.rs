//! Health endpoints

use axum::{extract::State, http::StatusCode, Json};
use reconnect_db::Database;
use serde_json::json;

/// GET /health — process is up.
pub async fn liveness() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /health/ready — the database answers.
pub async fn readiness(
    State(db): State<Database>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    match db.ping().await {
        Ok(()) => Ok(Json(json!({ "status": "ready" }))),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
