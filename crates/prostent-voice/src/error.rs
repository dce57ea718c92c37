use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("text is required")]
    EmptyText,

    #[error("text exceeds maximum size: {len} bytes (limit: {limit} bytes)")]
    TextTooLong { len: usize, limit: usize },

    #[error("TTS API key invalid or expired")]
    Unauthorized,

    #[error("invalid text or voice parameters: {0}")]
    InvalidParameters(String),

    #[error("TTS provider returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("TTS request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}
