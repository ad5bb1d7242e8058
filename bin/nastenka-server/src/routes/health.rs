//! Health / heartbeat endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::warn;
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(get_health))]
pub struct HealthApi;

/// Register health-check routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(get_health))
}

/// Heartbeat endpoint.
///
/// 200 with `{"status": "ok", ...}` while the message store answers,
/// 503 with `"status": "degraded"` otherwise.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server and store are healthy", body = Value),
        (status = 503, description = "Store unreachable", body = Value),
    )
)]
pub async fn get_health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let store_ok = match state.board.store().ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "health check: store ping failed");
            false
        }
    };
    let status = if store_ok { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (
        status,
        Json(json!({
            "status":   if store_ok { "ok" } else { "degraded" },
            "database": if store_ok { "ok" } else { "unavailable" },
            "version":  env!("CARGO_PKG_VERSION"),
        })),
    )
}
