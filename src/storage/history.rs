//! Append-only assessment audit log.

use rusqlite::params;
use serde::Serialize;
use serde_json::Value;

use crate::address::SolanaAddress;
use crate::scoring::{RiskLabel, RiskVerdict};
use crate::storage::{Database, Page, StorageError, StorageResult};

/// One stored assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub address: String,
    pub summary: String,
    pub risk_score: u8,
    pub risk_label: RiskLabel,
    pub details: Value,
    pub errors: Vec<Value>,
    pub created_at: i64,
}

/// Assessment about to be appended.
#[derive(Debug, Clone)]
pub struct NewHistoryRecord {
    pub address: SolanaAddress,
    pub summary: String,
    pub verdict: RiskVerdict,
    pub details: Value,
    pub errors: Vec<Value>,
}

/// History table access. There is no update or delete.
#[derive(Clone, Debug)]
pub struct HistoryStore {
    db: Database,
}

type RawRow = (i64, String, String, i64, String, String, String, Option<i64>);

impl HistoryStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Append one record and return its id.
    pub async fn append(&self, record: NewHistoryRecord) -> StorageResult<i64> {
        let details = serde_json::to_string(&record.details)?;
        let errors = serde_json::to_string(&record.errors)?;
        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO history(address, summary, risk_score, risk_label, details_json, errors_json)
                     VALUES(?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        record.address.as_str(),
                        record.summary,
                        record.verdict.score,
                        record.verdict.label.as_str(),
                        details,
                        errors,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
    }

    /// Newest first.
    pub async fn list(&self, page: Page) -> StorageResult<Vec<HistoryRecord>> {
        let rows: Vec<RawRow> = self
            .db
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, address, summary, risk_score, risk_label, details_json, errors_json, created_at
                     FROM history ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
                )?;
                let rows = stmt
                    .query_map(params![page.limit, page.offset], |row| {
                        Ok((
                            row.get(0)?,
                            row.get(1)?,
                            row.get(2)?,
                            row.get(3)?,
                            row.get(4)?,
                            row.get(5)?,
                            row.get(6)?,
                            row.get(7)?,
                        ))
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await?;

        rows.into_iter().map(decode).collect()
    }
}

fn decode(row: RawRow) -> StorageResult<HistoryRecord> {
    let (id, address, summary, score, label, details, errors, created_at) = row;
    let risk_score = u8::try_from(score)
        .map_err(|_| StorageError::Corrupt(format!("history {id}: risk_score {score} out of range")))?;
    let risk_label = label
        .parse()
        .map_err(|e| StorageError::Corrupt(format!("history {id}: {e}")))?;

    Ok(HistoryRecord {
        id,
        address,
        summary,
        risk_score,
        risk_label,
        details: serde_json::from_str(&details)?,
        errors: serde_json::from_str(&errors)?,
        created_at: created_at.unwrap_or_default(),
    })
}
