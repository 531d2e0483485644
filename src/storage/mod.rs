//! Durable storage subsystem (SQLite).
//!
//! # Data Flow
//! ```text
//! Database::open(path)
//!     → PRAGMA journal_mode = WAL, busy timeout
//!     → schema.rs (idempotent migration)
//!     → blacklist.rs (BlacklistStore: upsert/get/list/remove/import)
//!     → history.rs (HistoryStore: append/list)
//! ```
//!
//! # Design Decisions
//! - One connection behind a mutex; calls run on the blocking pool
//! - Row-level atomicity only, except bulk import (one transaction)
//! - A write failure is returned to the caller, never swallowed

pub mod blacklist;
pub mod history;
pub mod schema;

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::Connection;
use serde::Serialize;
use thiserror::Error;

pub use blacklist::{BlacklistEntry, BlacklistStore, NewBlacklistEntry};
pub use history::{HistoryRecord, HistoryStore, NewHistoryRecord};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error("storage task failed: {0}")]
    Task(String),

    #[error("database connection lock poisoned")]
    Poisoned,
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Shared handle to the SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database file and migrate it.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Self::init(conn)
    }

    /// Private in-memory database, used by tests.
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StorageResult<Self> {
        schema::migrate(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn blacklist(&self) -> BlacklistStore {
        BlacklistStore::new(self.clone())
    }

    pub fn history(&self) -> HistoryStore {
        HistoryStore::new(self.clone())
    }

    /// Run `f` against the connection on the blocking pool.
    pub(crate) async fn call<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&mut Connection) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| StorageError::Poisoned)?;
            f(&mut guard)
        })
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

/// Limit/offset window for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Page {
    /// Build a page from untrusted query text.
    ///
    /// Missing or unparsable values fall back to defaults, `limit` is capped
    /// at `max_limit`, and negative values clamp to zero.
    pub fn from_query(limit: Option<&str>, offset: Option<&str>, default_limit: u32, max_limit: u32) -> Self {
        let parse = |raw: Option<&str>| raw.and_then(|v| v.trim().parse::<i64>().ok());
        let limit = parse(limit)
            .unwrap_or(i64::from(default_limit))
            .clamp(0, i64::from(max_limit));
        let offset = parse(offset).unwrap_or(0).clamp(0, i64::from(u32::MAX));
        Self {
            limit: limit as u32,
            offset: offset as u32,
        }
    }
}
