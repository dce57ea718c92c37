use crate::config::TtsConfig;
use crate::error::VoiceError;
use prostent_types::VoiceSettings;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Maximum text input size for TTS (64 KiB). Larger requests are refused
/// before anything is sent upstream.
pub const MAX_TTS_INPUT_BYTES: usize = 64 * 1024;

/// Text sent by [`TtsService::probe`].
const PROBE_TEXT: &str = "Test";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateSpeech<'a> {
    voice_id: &'a str,
    text: &'a str,
    rate: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pitch: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    emotion: Option<&'a str>,
}

#[derive(Deserialize)]
struct ProviderMessage {
    message: Option<String>,
    #[serde(rename = "errorMessage")]
    error_message: Option<String>,
}

/// Client for the Murf speech API.
#[derive(Debug, Clone)]
pub struct TtsService {
    http: reqwest::Client,
    config: TtsConfig,
}

impl TtsService {
    /// # Errors
    ///
    /// Returns `VoiceError::Transport` if the HTTP client cannot be built.
    pub fn new(config: TtsConfig) -> Result<Self, VoiceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    /// Voice parameters applied to fields a request leaves out.
    pub fn default_voice(&self) -> &VoiceSettings {
        &self.config.default_voice
    }

    pub fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    fn endpoint(&self) -> String {
        format!("{}/speech/generate", self.config.base_url.trim_end_matches('/'))
    }

    /// Renders `text` with `voice` and returns the provider's audio bytes
    /// (`audio/mpeg`).
    pub async fn synthesize(&self, text: &str, voice: &VoiceSettings) -> Result<Vec<u8>, VoiceError> {
        if text.trim().is_empty() {
            return Err(VoiceError::EmptyText);
        }
        if text.len() > MAX_TTS_INPUT_BYTES {
            return Err(VoiceError::TextTooLong {
                len: text.len(),
                limit: MAX_TTS_INPUT_BYTES,
            });
        }
        if !self.is_configured() {
            return Err(VoiceError::Config("TTS API key is not set".to_string()));
        }

        let body = GenerateSpeech {
            voice_id: &voice.voice_id,
            text,
            rate: voice.rate,
            pitch: Some(voice.pitch),
            emotion: Some(voice.emotion.as_str()),
        };

        tracing::debug!(voice_id = %voice.voice_id, chars = text.len(), "requesting speech");

        let resp = self
            .http
            .post(self.endpoint())
            .header("api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp.bytes().await?.to_vec());
        }

        let raw = resp.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), body = %raw, "TTS provider rejected request");
        Err(classify(status, raw))
    }

    /// Sends a one-word request with the default voice and a short timeout.
    pub async fn probe(&self) -> Result<(), VoiceError> {
        if !self.is_configured() {
            return Err(VoiceError::Config("TTS API key is not set".to_string()));
        }

        let body = GenerateSpeech {
            voice_id: &self.config.default_voice.voice_id,
            text: PROBE_TEXT,
            rate: 1.0,
            pitch: None,
            emotion: None,
        };

        let resp = self
            .http
            .post(self.endpoint())
            .header("api-key", &self.config.api_key)
            .timeout(Duration::from_secs(self.config.probe_timeout_secs))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(classify(status, resp.text().await.unwrap_or_default()))
        }
    }
}

fn classify(status: StatusCode, body: String) -> VoiceError {
    match status {
        StatusCode::UNAUTHORIZED => VoiceError::Unauthorized,
        StatusCode::BAD_REQUEST => {
            let detail = serde_json::from_str::<ProviderMessage>(&body)
                .ok()
                .and_then(|m| m.message.or(m.error_message))
                .unwrap_or(body);
            VoiceError::InvalidParameters(detail)
        }
        _ => VoiceError::Upstream {
            status: status.as_u16(),
            body,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_maps_statuses() {
        assert!(matches!(
            classify(StatusCode::UNAUTHORIZED, String::new()),
            VoiceError::Unauthorized
        ));
        assert!(matches!(
            classify(StatusCode::TOO_MANY_REQUESTS, "slow down".to_string()),
            VoiceError::Upstream { status: 429, .. }
        ));
    }

    #[test]
    fn bad_request_prefers_provider_message() {
        match classify(
            StatusCode::BAD_REQUEST,
            r#"{"errorMessage":"unknown voice"}"#.to_string(),
        ) {
            VoiceError::InvalidParameters(msg) => assert_eq!(msg, "unknown voice"),
            other => panic!("unexpected: {other:?}"),
        }

        match classify(StatusCode::BAD_REQUEST, "plain text".to_string()) {
            VoiceError::InvalidParameters(msg) => assert_eq!(msg, "plain text"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn probe_body_omits_optional_fields() {
        let body = GenerateSpeech {
            voice_id: "en-US-thomas",
            text: PROBE_TEXT,
            rate: 1.0,
            pitch: None,
            emotion: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["voiceId"], "en-US-thomas");
        assert!(value.get("pitch").is_none());
        assert!(value.get("emotion").is_none());
    }
}
