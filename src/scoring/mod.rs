//! Risk scoring subsystem.
//!
//! # Data Flow
//! ```text
//! local matches + reputation positives + activity counts
//!     → types.rs (AggregatedSignal)
//!     → engine.rs (score: monotone raises, then one discount)
//!     → RiskVerdict { score, label }
//! ```
//!
//! # Design Decisions
//! - Pure and total: no I/O, no failure path
//! - Insensitive to which source answered first

pub mod engine;
pub mod types;

pub use engine::{evaluate, is_critical, score, CRITICAL_ATTRIBUTES};
pub use types::{AggregatedSignal, RiskLabel, RiskVerdict, UnknownLabel};
