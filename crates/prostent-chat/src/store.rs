//! Session persistence.

use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use prostent_db::DbPool;
use prostent_types::{ChatSession, Message};
use rusqlite::{params, Connection, OptionalExtension};

/// Durable storage for chat sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Looks a session up by its public key.
    async fn find_by_key(&self, session_id: &str) -> Result<Option<ChatSession>, StoreError>;

    /// Inserts or fully replaces a session and returns what was stored.
    ///
    /// The whole document is written at once; there is no version check, so
    /// of two concurrent saves of the same session the later one wins.
    async fn save(&self, session: ChatSession) -> Result<ChatSession, StoreError>;

    /// All sessions owned by `user_id`, newest first.
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<ChatSession>, StoreError>;
}

/// Fixed-width UTC timestamps so that text ordering is time ordering.
fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("bad timestamp {raw:?}: {e}")))
}

struct SessionRow {
    session_id: String,
    user_id: String,
    messages_json: String,
    created_at: String,
    updated_at: String,
}

impl SessionRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            session_id: row.get(0)?,
            user_id: row.get(1)?,
            messages_json: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }

    fn into_session(self) -> Result<ChatSession, StoreError> {
        let messages: Vec<Message> = serde_json::from_str(&self.messages_json)?;
        Ok(ChatSession {
            created_at: parse_ts(&self.created_at)?,
            updated_at: parse_ts(&self.updated_at)?,
            session_id: self.session_id,
            user_id: self.user_id,
            messages,
        })
    }
}

/// Reads one session by key.
pub fn get_session(conn: &Connection, session_id: &str) -> Result<Option<ChatSession>, StoreError> {
    conn.query_row(
        "SELECT session_id, user_id, messages_json, created_at, updated_at
         FROM chat_sessions WHERE session_id = ?1",
        [session_id],
        SessionRow::from_row,
    )
    .optional()?
    .map(SessionRow::into_session)
    .transpose()
}

/// Writes a whole session in one statement.
pub fn upsert_session(conn: &Connection, session: &ChatSession) -> Result<(), StoreError> {
    let messages_json = serde_json::to_string(&session.messages)?;
    conn.execute(
        "INSERT INTO chat_sessions (session_id, user_id, messages_json, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(session_id) DO UPDATE SET
            user_id = excluded.user_id,
            messages_json = excluded.messages_json,
            updated_at = excluded.updated_at",
        params![
            session.session_id,
            session.user_id,
            messages_json,
            format_ts(&session.created_at),
            format_ts(&session.updated_at),
        ],
    )?;
    Ok(())
}

/// Lists a user's sessions, most recently created first.
pub fn list_sessions_for_user(
    conn: &Connection,
    user_id: &str,
) -> Result<Vec<ChatSession>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT session_id, user_id, messages_json, created_at, updated_at
         FROM chat_sessions WHERE user_id = ?1
         ORDER BY created_at DESC, id DESC",
    )?;

    let rows = stmt.query_map([user_id], SessionRow::from_row)?;
    let mut sessions = Vec::new();
    for row in rows {
        sessions.push(row?.into_session()?);
    }
    Ok(sessions)
}

/// [`SessionStore`] backed by the SQLite pool.
///
/// Every call runs on tokio's blocking pool.
#[derive(Clone)]
pub struct SqliteSessionStore {
    pool: DbPool,
}

impl SqliteSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn find_by_key(&self, session_id: &str) -> Result<Option<ChatSession>, StoreError> {
        let key = session_id.to_string();
        self.with_conn(move |conn| get_session(conn, &key)).await
    }

    async fn save(&self, session: ChatSession) -> Result<ChatSession, StoreError> {
        self.with_conn(move |conn| {
            upsert_session(conn, &session)?;
            Ok(session)
        })
        .await
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<ChatSession>, StoreError> {
        let user = user_id.to_string();
        self.with_conn(move |conn| list_sessions_for_user(conn, &user))
            .await
    }
}
