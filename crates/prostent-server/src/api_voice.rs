//! TTS provider health probe.

use crate::AppState;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

const SERVICE_NAME: &str = "Murf Falcon TTS";

/// Handler for `POST /api/voice/health`.
///
/// Sends a one-word synthesis request. Returns 200 when the provider answers,
/// 503 with the failure reason otherwise.
pub async fn voice_health_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> (StatusCode, Json<Value>) {
    let timestamp = Utc::now().to_rfc3339();

    match state.tts.probe().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "service": SERVICE_NAME,
                "apiReachable": true,
                "timestamp": timestamp,
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "TTS health probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "service": SERVICE_NAME,
                    "apiReachable": false,
                    "error": e.to_string(),
                    "timestamp": timestamp,
                })),
            )
        }
    }
}
