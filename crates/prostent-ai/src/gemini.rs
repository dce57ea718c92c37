//! Google Gemini `generateContent` client.

use crate::context::{ContextTurn, Speaker};
use crate::error::ProviderFailure;
use crate::CompletionProvider;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-pro".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Connection settings for the Gemini API.
#[derive(Clone, Deserialize)]
pub struct GeminiConfig {
    /// API root, without the `/v1beta` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model name, e.g. `gemini-pro`.
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: String,
    /// Whole-request timeout in seconds. Default: 30.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: Speaker,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Debug)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn into_text(self) -> Result<String, ProviderFailure> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ProviderFailure::Malformed(format!("prompt blocked: {reason}")));
        }

        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ProviderFailure::Malformed(
                "response contained no candidate text".to_string(),
            ));
        }
        Ok(text)
    }
}

/// HTTP client for Gemini's `models/{model}:generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Builds a client whose requests time out after `config.timeout_secs`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderFailure::Transport` if the TLS backend cannot be
    /// initialised.
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderFailure> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("prostent-backend/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    async fn complete(&self, context: &[ContextTurn]) -> Result<String, ProviderFailure> {
        if self.config.api_key.is_empty() {
            return Err(ProviderFailure::Config("Gemini API key is not set".to_string()));
        }

        let body = GenerateRequest {
            contents: context
                .iter()
                .map(|turn| Content {
                    role: turn.speaker,
                    parts: [Part { text: &turn.text }],
                })
                .collect(),
        };

        tracing::debug!(model = %self.config.model, turns = context.len(), "requesting completion");

        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let raw = resp.text().await?;

        if !status.is_success() {
            return Err(ProviderFailure::Status {
                status: status.as_u16(),
                body: raw,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&raw)
            .map_err(|e| ProviderFailure::Malformed(e.to_string()))?;
        parsed.into_text()
    }
}
