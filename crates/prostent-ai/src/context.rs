//! Transcript-to-context mapping.
//!
//! Gemini knows two speakers, `user` and `model`. Our transcript roles map
//! onto them one to one; the match below is exhaustive, so adding a role to
//! [`MessageRole`] forces a decision here.

use prostent_types::{Message, MessageRole};
use serde::Serialize;

/// Speaker tag as the completion provider expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Model,
}

impl From<MessageRole> for Speaker {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => Self::User,
            MessageRole::Assistant => Self::Model,
        }
    }
}

/// One turn of provider context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl ContextTurn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }
}

/// Maps every message of a transcript, in order, to a provider turn.
pub fn build_context(messages: &[Message]) -> Vec<ContextTurn> {
    messages
        .iter()
        .map(|m| ContextTurn::new(m.role.into(), m.content.clone()))
        .collect()
}
