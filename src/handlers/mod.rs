mod cleanup;
mod lobby;

pub use cleanup::handle_cleanup;
pub use lobby::handle_lobby;

use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

pub async fn health_check() -> &'static str {
    "OK"
}

/// Probe the `programs` table through the configured store
pub async fn database_health(State(state): State<Arc<AppState>>) -> Response {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "OK").into_response(),
        Err(e) => {
            tracing::warn!("Database health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response()
        }
    }
}
