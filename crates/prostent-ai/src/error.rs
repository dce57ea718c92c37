use thiserror::Error;

/// Why a completion call produced no reply.
#[derive(Debug, Error)]
pub enum ProviderFailure {
    #[error("completion request timed out")]
    Timeout,

    #[error("completion request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("completion provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed completion response: {0}")]
    Malformed(String),

    #[error("invalid provider configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ProviderFailure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(e)
        }
    }
}
