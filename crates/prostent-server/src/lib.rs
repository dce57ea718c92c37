//! Prostent server library logic.

pub mod api;
pub mod api_chat;
pub mod api_voice;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use prostent_chat::ConversationService;
use prostent_voice::TtsService;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Maximum accepted request body.
const MAX_REQUEST_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Chat session workflow.
    pub conversations: ConversationService,
    /// Speech synthesis client.
    pub tts: Arc<TtsService>,
    /// Process start, reported as `uptime` by the health endpoint.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(conversations: ConversationService, tts: TtsService) -> Self {
        Self {
            conversations,
            tts: Arc::new(tts),
            started_at: Instant::now(),
        }
    }
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Prostent Voice Agent Backend API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Voice-first conversational agent backend",
    }))
}

/// Health check handler. `uptime` is in seconds.
async fn health(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "running",
        "service": "Prostent Backend",
        "timestamp": Utc::now().to_rfc3339(),
        "uptime": state.started_at.elapsed().as_secs_f64(),
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route(
            "/api/chat/session",
            post(api_chat::create_session_handler),
        )
        .route(
            "/api/chat/message",
            post(api_chat::append_message_handler),
        )
        .route(
            "/api/chat/history/{sessionId}",
            get(api_chat::history_handler),
        )
        .route(
            "/api/chat/user/{userId}",
            get(api_chat::user_sessions_handler),
        )
        .route("/api/chat/speech", post(api_chat::speech_handler))
        .route("/api/voice/health", post(api_voice::voice_health_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
