use crate::AppState;
use crate::lifecycle::{self, CleanupReport};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct CleanupResponse {
    success: bool,
    #[serde(flatten)]
    report: CleanupReport,
}

/// Trigger for the external scheduler: runs the lifecycle policy once.
/// Any request body is ignored.
pub async fn handle_cleanup(State(state): State<Arc<AppState>>) -> Response {
    tracing::info!("Running room cleanup");

    match lifecycle::run(state.store.as_ref(), &state.policy, Utc::now()).await {
        Ok(report) => Json(CleanupResponse {
            success: true,
            report,
        })
        .into_response(),
        Err(e) => {
            tracing::error!("Room cleanup failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
