//! Completion provider boundary for the Prostent backend.
//!
//! The conversation workflow only needs one capability from a language
//! model: given the transcript so far, return the next reply. That
//! capability is the [`CompletionProvider`] trait. [`GeminiClient`] is the
//! production implementation; tests substitute their own.
//!
//! Failures come back as an explicit [`ProviderFailure`] value so callers can
//! decide what to do with them instead of unwinding.

pub mod context;
pub mod error;
pub mod gemini;

use async_trait::async_trait;

pub use context::{build_context, ContextTurn, Speaker};
pub use error::ProviderFailure;
pub use gemini::{GeminiClient, GeminiConfig};

/// A language model that can continue a conversation.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Produces the next assistant turn for `context`.
    ///
    /// `context` holds the whole transcript in conversation order, the
    /// newest user turn last.
    async fn complete(&self, context: &[ContextTurn]) -> Result<String, ProviderFailure>;
}
