//! Embedded SQL migration runner.
//!
//! Each migration is a SQL file compiled into the binary. Applied migrations
//! are recorded by name in `_prostent_migrations`; a recorded migration is
//! never run again.

use rusqlite::Connection;
use thiserror::Error;

struct Migration {
    name: &'static str,
    sql: &'static str,
}

/// Ordered migration list. Append only.
const MIGRATIONS: &[Migration] = &[
    Migration {
        name: "000_init",
        sql: include_str!("migrations/000_init.sql"),
    },
    Migration {
        name: "001_chat_sessions",
        sql: include_str!("migrations/001_chat_sessions.sql"),
    },
];

const TRACKING_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS _prostent_migrations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);";

/// Errors that can occur during migration execution.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("migration '{name}' failed: {source}")]
    ExecutionFailed {
        name: String,
        source: rusqlite::Error,
    },

    #[error("failed to check migration state: {0}")]
    StateQuery(rusqlite::Error),
}

/// Applies every pending migration in order and returns how many ran.
///
/// Each migration runs inside its own transaction together with its
/// tracking row, so a failure leaves no partial schema behind.
///
/// # Errors
///
/// Returns `MigrationError` if a migration fails or the tracking table cannot
/// be read.
pub fn run_migrations(conn: &Connection) -> Result<usize, MigrationError> {
    apply(conn, MIGRATIONS)
}

fn apply(conn: &Connection, migrations: &[Migration]) -> Result<usize, MigrationError> {
    conn.execute_batch(TRACKING_TABLE_SQL)
        .map_err(|source| MigrationError::ExecutionFailed {
            name: "_prostent_migrations_bootstrap".to_string(),
            source,
        })?;

    let mut applied = 0;

    for migration in migrations {
        let done: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM _prostent_migrations WHERE name = ?1",
                [migration.name],
                |row| row.get(0),
            )
            .map_err(MigrationError::StateQuery)?;

        if done {
            tracing::debug!(migration = migration.name, "already applied");
            continue;
        }

        tracing::info!(migration = migration.name, "applying migration");

        let failed = |source| MigrationError::ExecutionFailed {
            name: migration.name.to_string(),
            source,
        };

        let tx = conn.unchecked_transaction().map_err(failed)?;
        tx.execute_batch(migration.sql).map_err(failed)?;
        tx.execute(
            "INSERT INTO _prostent_migrations (name) VALUES (?1)",
            [migration.name],
        )
        .map_err(failed)?;
        tx.commit().map_err(failed)?;

        applied += 1;
    }

    Ok(applied)
}
