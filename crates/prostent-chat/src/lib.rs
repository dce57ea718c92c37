//! Chat sessions and the message-append workflow.
//!
//! A chat session is a persisted transcript. Appending a user message to it
//! asks the completion provider for a reply and stores the reply in the same
//! write. Provider outages never fail an append: the turn is closed with a
//! fixed fallback reply instead (see [`FALLBACK_REPLY`]).
//!
//! Persistence sits behind [`SessionStore`]; [`SqliteSessionStore`] keeps each
//! session as one JSON document row in SQLite.

mod error;
mod service;
mod store;

pub use error::{ChatError, StoreError};
pub use service::{ConversationService, FALLBACK_REPLY};
pub use store::{
    get_session, list_sessions_for_user, upsert_session, SessionStore, SqliteSessionStore,
};
