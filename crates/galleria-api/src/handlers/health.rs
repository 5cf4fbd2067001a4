//! Health check handlers.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use std::time::Duration;

const READINESS_TIMEOUT: Duration = Duration::from_secs(5);

/// Liveness: the process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness: the storage backend answers a list call.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let storage = state.pipeline.storage();

    let mut response = serde_json::json!({
        "status": "ready",
        "storage": "unknown",
        "backend": storage.backend_type().to_string(),
    });

    let ready = match tokio::time::timeout(
        READINESS_TIMEOUT,
        storage.list(storage.asset_prefix()),
    )
    .await
    {
        Ok(Ok(_)) => {
            response["storage"] = serde_json::json!("ready");
            true
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Storage readiness check failed");
            response["storage"] = serde_json::json!("not_ready");
            false
        }
        Err(_) => {
            tracing::error!("Storage readiness check timed out");
            response["storage"] = serde_json::json!("timeout");
            false
        }
    };

    let status_code = if ready {
        StatusCode::OK
    } else {
        response["status"] = serde_json::json!("not_ready");
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
