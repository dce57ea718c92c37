//! Database layer for the Prostent backend.
//!
//! Provides the SQLite connection pool (via `r2d2`), WAL-mode initialization
//! and the embedded, versioned schema migrations. The chat history lives in
//! SQLite as one JSON document per session; the queries themselves belong to
//! `prostent-chat`.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};
