//! The conversation append workflow.

use crate::error::ChatError;
use crate::store::SessionStore;
use chrono::Utc;
use prostent_ai::{build_context, CompletionProvider, ProviderFailure};
use prostent_types::{ChatSession, MessageRole};
use std::sync::Arc;

/// Assistant reply stored when the completion provider fails.
pub const FALLBACK_REPLY: &str =
    "Sorry, I encountered an error processing your request. Please try again.";

/// Chat session operations over a store and a completion provider.
///
/// # Concurrency
///
/// [`append_message`](Self::append_message) is a single read-modify-write of
/// the session with the provider call in between. Two appends to the same
/// session running at the same time are not serialized: both read the same
/// transcript and the later save overwrites the earlier one.
#[derive(Clone)]
pub struct ConversationService {
    store: Arc<dyn SessionStore>,
    provider: Arc<dyn CompletionProvider>,
}

impl ConversationService {
    pub fn new(store: Arc<dyn SessionStore>, provider: Arc<dyn CompletionProvider>) -> Self {
        Self { store, provider }
    }

    /// Starts an empty session for `user_id`.
    pub async fn create_session(&self, user_id: &str) -> Result<ChatSession, ChatError> {
        let session = self.store.save(ChatSession::new(user_id)).await?;
        tracing::info!(session_id = %session.session_id, user_id, "chat session created");
        Ok(session)
    }

    /// Appends one message and, for user messages, the model's reply.
    ///
    /// The returned session is exactly what was persisted. A provider
    /// failure still returns `Ok`, with [`FALLBACK_REPLY`] as the trailing
    /// assistant message.
    ///
    /// # Errors
    ///
    /// - [`ChatError::NotFound`] if no session has this key. Nothing is written.
    /// - [`ChatError::Persistence`] if the load or the final save fails. The
    ///   append is not retried.
    pub async fn append_message(
        &self,
        session_id: &str,
        role: MessageRole,
        content: impl Into<String>,
    ) -> Result<ChatSession, ChatError> {
        let mut session = self
            .store
            .find_by_key(session_id)
            .await?
            .ok_or_else(|| ChatError::NotFound(session_id.to_string()))?;

        session.push(role, content);

        if role == MessageRole::User {
            let reply = self.reply_to(&session).await;
            session.push(MessageRole::Assistant, reply);
        }

        session.updated_at = Utc::now();
        let saved = self.store.save(session).await?;

        tracing::debug!(
            session_id,
            role = role.as_str(),
            messages = saved.messages.len(),
            "message appended"
        );
        Ok(saved)
    }

    /// Returns the stored session.
    pub async fn history(&self, session_id: &str) -> Result<ChatSession, ChatError> {
        self.store
            .find_by_key(session_id)
            .await?
            .ok_or_else(|| ChatError::NotFound(session_id.to_string()))
    }

    /// Returns every session of a user, newest first.
    pub async fn user_sessions(&self, user_id: &str) -> Result<Vec<ChatSession>, ChatError> {
        Ok(self.store.find_by_user(user_id).await?)
    }

    /// Asks the provider for the next turn; never fails.
    async fn reply_to(&self, session: &ChatSession) -> String {
        let context = build_context(&session.messages);

        match self.provider.complete(&context).await {
            Ok(text) => text,
            Err(failure) => {
                log_provider_failure(&session.session_id, &failure);
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

fn log_provider_failure(session_id: &str, failure: &ProviderFailure) {
    let kind = match failure {
        ProviderFailure::Timeout => "timeout",
        ProviderFailure::Transport(_) => "transport",
        ProviderFailure::Status { .. } => "status",
        ProviderFailure::Malformed(_) => "malformed",
        ProviderFailure::Config(_) => "config",
    };
    tracing::error!(
        session_id,
        kind,
        error = %failure,
        "completion failed, storing fallback reply"
    );
}
