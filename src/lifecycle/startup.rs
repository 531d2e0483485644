//! Startup orchestration.
//!
//! # Responsibilities
//! - Open and migrate the database
//! - Build the shared source cache and both source clients
//! - Assemble the handler state
//!
//! Any error here is fatal; listeners start only after this succeeds.

use thiserror::Error;

use crate::cache::TtlCache;
use crate::config::RiskConfig;
use crate::http::AppState;
use crate::sources::{SetupError, SourceClients};
use crate::storage::{Database, StorageError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to open database: {0}")]
    Storage(#[from] StorageError),

    #[error("failed to build source clients: {0}")]
    Sources(#[from] SetupError),
}

/// Build handler state from `config` against the database at `config.storage.sqlite_file`.
pub fn initialize(config: &RiskConfig) -> Result<AppState, StartupError> {
    let db = Database::open(&config.storage.sqlite_file)?;
    tracing::info!(path = %config.storage.sqlite_file, "Database ready");
    initialize_with(config, &db)
}

/// Build handler state against an already opened database.
pub fn initialize_with(config: &RiskConfig, db: &Database) -> Result<AppState, StartupError> {
    let cache = TtlCache::new(config.cache.max_entries);
    let sources = SourceClients::from_config(config, cache)?;

    tracing::info!(
        helius = sources.helius.is_enabled(),
        goplus = sources.goplus.has_credentials(),
        cache_entries = config.cache.max_entries,
        "Sources configured"
    );
    if !sources.helius.is_enabled() {
        tracing::warn!("HELIUS_API_KEY not set; activity source disabled");
    }

    Ok(AppState::new(db, sources))
}
