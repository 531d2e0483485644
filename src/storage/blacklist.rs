//! Locally curated blacklist.

use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use crate::address::SolanaAddress;
use crate::storage::{Database, Page, StorageResult};

const UPSERT: &str = "
INSERT INTO blacklist(address, reason, source) VALUES(?1, ?2, ?3)
ON CONFLICT(address) DO UPDATE SET reason = excluded.reason, source = excluded.source
";

/// A stored blacklist row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlacklistEntry {
    pub address: String,
    pub reason: String,
    pub source: String,
    /// Unix seconds of first insertion; upserts keep it.
    pub created_at: i64,
}

impl BlacklistEntry {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            address: row.get(0)?,
            reason: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            source: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            created_at: row.get::<_, Option<i64>>(3)?.unwrap_or_default(),
        })
    }
}

/// Row to insert or overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlacklistEntry {
    pub address: SolanaAddress,
    pub reason: String,
    pub source: String,
}

/// Blacklist table access.
#[derive(Clone, Debug)]
pub struct BlacklistStore {
    db: Database,
}

impl BlacklistStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn get(&self, address: &SolanaAddress) -> StorageResult<Option<BlacklistEntry>> {
        let address = address.to_string();
        self.db
            .call(move |conn| {
                let entry = conn
                    .query_row(
                        "SELECT address, reason, source, created_at FROM blacklist WHERE address = ?1",
                        params![address],
                        BlacklistEntry::from_row,
                    )
                    .optional()?;
                Ok(entry)
            })
            .await
    }

    /// Insert, or overwrite reason/source of the existing row.
    pub async fn upsert(&self, entry: NewBlacklistEntry) -> StorageResult<()> {
        self.db
            .call(move |conn| {
                conn.execute(UPSERT, params![entry.address.as_str(), entry.reason, entry.source])?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    /// Newest first.
    pub async fn list(&self, page: Page) -> StorageResult<Vec<BlacklistEntry>> {
        self.db
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT address, reason, source, created_at FROM blacklist
                     ORDER BY created_at DESC, rowid DESC LIMIT ?1 OFFSET ?2",
                )?;
                let rows = stmt
                    .query_map(params![page.limit, page.offset], BlacklistEntry::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await
    }

    /// Returns whether a row was deleted.
    pub async fn remove(&self, address: &SolanaAddress) -> StorageResult<bool> {
        let address = address.to_string();
        self.db
            .call(move |conn| {
                let deleted = conn.execute("DELETE FROM blacklist WHERE address = ?1", params![address])?;
                Ok(deleted > 0)
            })
            .await
    }

    /// Upsert every row in one transaction; all rows land or none do.
    pub async fn import(&self, entries: Vec<NewBlacklistEntry>) -> StorageResult<usize> {
        let count = entries.len();
        self.db
            .call(move |conn| {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(UPSERT)?;
                    for entry in &entries {
                        stmt.execute(params![entry.address.as_str(), entry.reason, entry.source])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await?;
        tracing::info!(count, "Blacklist import committed");
        Ok(count)
    }
}
