//! Assessment request, result and failure types.

use serde::Serialize;
use thiserror::Error;

use crate::address::{InvalidAddress, SolanaAddress};
use crate::scoring::RiskVerdict;
use crate::sources::{ActivityReport, AuthError, ReputationReport, SourceSlot};
use crate::storage::{BlacklistEntry, StorageError};

/// One assessment request as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentRequest {
    /// Raw address text; validated before any I/O.
    pub address: String,
    /// Opt in to the reputation source.
    pub use_goplus: bool,
}

/// Local blacklist evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalEvidence {
    pub matches: Vec<BlacklistEntry>,
}

/// Structured evidence behind a verdict. Stored verbatim in history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentDetails {
    pub local: LocalEvidence,
    /// Transactions are truncated to the first ten.
    pub helius: ActivityReport,
    /// Omitted when the caller did not request the reputation source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goplus: Option<SourceSlot<ReputationReport>>,
}

/// A completed, persisted assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub address: SolanaAddress,
    pub summary: String,
    pub risk: RiskVerdict,
    pub details: AssessmentDetails,
    /// Id of the history row written for this assessment.
    #[serde(skip)]
    pub history_id: i64,
}

/// Why an assessment could not be completed.
#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error(transparent)]
    InvalidAddress(#[from] InvalidAddress),

    /// The caller asked for the reputation source and no token could be obtained.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The audit record could not be written.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
