//! Shared types for the Prostent backend.
//!
//! This crate holds the domain types every other crate in the workspace
//! exchanges: chat sessions, transcript messages and their roles, and the
//! voice settings used for speech synthesis. It has no I/O of its own.

pub mod voice;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use voice::VoiceSettings;

/// Author of a transcript entry.
///
/// The set is closed: a tag other than `user` or `assistant` fails to
/// deserialize, so an unknown role never reaches the conversation workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// Written by the end user.
    User,
    /// Written by the language model (or the fallback substitute).
    Assistant,
}

impl MessageRole {
    /// Returns the wire tag for this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    /// When the entry was appended (UTC).
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a message stamped with the current time.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A persisted conversation thread.
///
/// Serialized with camelCase keys, which is the shape both the HTTP API and
/// the document store use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    /// Opaque public identifier, assigned at creation and never changed.
    pub session_id: String,
    /// The user that owns the session.
    pub user_id: String,
    /// Transcript in conversation order.
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    /// Last durable save.
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// Creates an empty session for `user_id` with a fresh UUID v4 key.
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends an entry to the end of the transcript.
    pub fn push(&mut self, role: MessageRole, content: impl Into<String>) {
        self.messages.push(Message::new(role, content));
    }

    /// Returns the last entry, if any.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}
