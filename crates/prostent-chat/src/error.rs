use thiserror::Error;

/// Errors raised by a [`SessionStore`](crate::SessionStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("database pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    /// A stored row could not be turned back into a session.
    #[error("corrupt session record: {0}")]
    Corrupt(String),
    #[error("storage task failed: {0}")]
    Task(String),
}

/// Errors that cross the conversation workflow boundary.
///
/// Completion provider failures never appear here: they are absorbed
/// into the transcript as a fallback reply.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat session not found: {0}")]
    NotFound(String),
    #[error("failed to persist chat session: {0}")]
    Persistence(#[from] StoreError),
}
