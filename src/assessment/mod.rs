//! Assessment pipeline.
//!
//! # Data Flow
//! ```text
//! AssessmentRequest
//!     → address validation (no I/O on failure)
//!     → blacklist lookup ∥ activity fetch ∥ reputation fetch (opt-in)
//!     → scoring::evaluate
//!     → summary.rs
//!     → history append
//!     → RiskAssessment
//! ```

pub mod orchestrator;
pub mod summary;
pub mod types;

pub use orchestrator::Assessor;
pub use types::{AssessmentDetails, AssessmentError, AssessmentRequest, LocalEvidence, RiskAssessment};
