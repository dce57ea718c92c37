//! Chat session and speech handlers.

use crate::api::{json_body, require, ApiError};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Extension, Json, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use prostent_types::{ChatSession, MessageRole};
use prostent_voice::VoiceError;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendMessageRequest {
    #[serde(default)]
    pub session_id: String,
    /// `"user"` or `"assistant"`; anything else is rejected during extraction.
    pub role: MessageRole,
    #[serde(default)]
    pub content: String,
}

/// Request body for speech synthesis. Omitted fields use the configured
/// default voice.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRequest {
    #[serde(default)]
    pub text: String,
    pub voice_id: Option<String>,
    pub rate: Option<f32>,
    pub pitch: Option<f32>,
    pub emotion: Option<String>,
}

/// Handler for `POST /api/chat/session`.
pub async fn create_session_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ChatSession>), ApiError> {
    let req = json_body(payload)?;
    require(&req.user_id, "userId")?;

    let session = state.conversations.create_session(&req.user_id).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Handler for `POST /api/chat/message`.
///
/// Responds with the whole session as persisted, including the assistant
/// reply (or the fallback reply) when the message came from the user.
pub async fn append_message_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<AppendMessageRequest>, JsonRejection>,
) -> Result<Json<ChatSession>, ApiError> {
    let req = json_body(payload)?;
    require(&req.session_id, "sessionId")?;
    require(&req.content, "content")?;

    let session = state
        .conversations
        .append_message(&req.session_id, req.role, req.content)
        .await?;
    Ok(Json(session))
}

/// Handler for `GET /api/chat/history/{sessionId}`.
pub async fn history_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<ChatSession>, ApiError> {
    Ok(Json(state.conversations.history(&session_id).await?))
}

/// Handler for `GET /api/chat/user/{userId}`.
pub async fn user_sessions_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ChatSession>>, ApiError> {
    Ok(Json(state.conversations.user_sessions(&user_id).await?))
}

/// Handler for `POST /api/chat/speech`. Returns `audio/mpeg` bytes.
pub async fn speech_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<SpeechRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = json_body(payload)?;
    if req.text.trim().is_empty() {
        return Err(ApiError::BadRequest("Text is required".to_string()));
    }

    let voice = state
        .tts
        .default_voice()
        .merged(req.voice_id, req.rate, req.pitch, req.emotion);

    let audio = state
        .tts
        .synthesize(&req.text, &voice)
        .await
        .map_err(speech_error)?;

    tracing::debug!(voice_id = %voice.voice_id, bytes = audio.len(), "speech generated");

    Ok((
        [
            (header::CONTENT_TYPE, "audio/mpeg".to_string()),
            (header::CONTENT_LENGTH, audio.len().to_string()),
        ],
        audio,
    )
        .into_response())
}

fn speech_error(err: VoiceError) -> ApiError {
    match err {
        VoiceError::EmptyText => ApiError::BadRequest("Text is required".to_string()),
        VoiceError::TextTooLong { .. } => ApiError::BadRequest(err.to_string()),
        VoiceError::Unauthorized => {
            ApiError::Unauthorized("Murf API key invalid or expired".to_string())
        }
        VoiceError::InvalidParameters(detail) => {
            tracing::warn!(%detail, "TTS provider rejected parameters");
            ApiError::BadRequest("Invalid text or voice parameters for Murf TTS".to_string())
        }
        other => {
            tracing::error!(error = %other, "speech generation failed");
            ApiError::InternalServerError("Failed to generate speech".to_string())
        }
    }
}
