//! SQLite connection management for the durable stores
//!
//! Both the transaction store and the offline queue share one connection,
//! serialized behind a mutex. SQLite's own transaction semantics make the
//! two durable resources safe to use from the interactive submission path
//! and the sync coordinator without additional locking.
//!
//! The database runs in WAL mode so that the queue survives process
//! restarts cleanly even when the writer is interrupted.

use crate::types::EngineError;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS transactions (
    id          TEXT PRIMARY KEY,
    action_type TEXT NOT NULL,
    payload     TEXT NOT NULL,
    fee         TEXT NOT NULL,
    status      TEXT NOT NULL,
    signature   TEXT,
    error       TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS offline_actions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    action_type TEXT NOT NULL,
    payload     TEXT NOT NULL,
    enqueued_at TEXT NOT NULL
);
";

/// Shared handle to the SQLite database
///
/// Cheaply cloneable; all clones share one underlying connection. Every
/// operation runs synchronously while holding the connection lock, so the
/// lock is never held across an await point.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database at the given path
    ///
    /// Applies the schema and switches the journal to WAL mode.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::StorageError` if the file cannot be opened or
    /// the schema cannot be applied.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database
    ///
    /// Durable only for the lifetime of this handle; used for tests and
    /// ephemeral runs.
    pub fn open_in_memory() -> Result<Self, EngineError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, EngineError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Lock the underlying connection
    ///
    /// A poisoned lock is recovered rather than propagated; the connection
    /// itself stays valid if a panic unwound past a holder.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
