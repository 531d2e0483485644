//! Deterministic risk score.
//!
//! Every rule can only raise the running score; the established-wallet
//! discount is applied once, after all raises, and floors at zero. The
//! integer output is a stable contract for clients, so the rules and
//! constants here must not drift.

use crate::scoring::types::{AggregatedSignal, RiskVerdict};

/// Reputation attributes severe enough to force a high score alone.
pub const CRITICAL_ATTRIBUTES: [&str; 6] = [
    "phishing_activities",
    "stealing_attack",
    "blacklist_doubt",
    "fake_kyc",
    "malicious_behavior",
    "is_blacklist",
];

const LOCAL_MATCH_SCORE: u8 = 90;
const CRITICAL_SCORE: u8 = 80;
const FLAGGED_SCORE: u8 = 60;
const DORMANT_SCORE: u8 = 40;
const ESTABLISHED_DISCOUNT: u8 = 10;
const ESTABLISHED_TX_THRESHOLD: usize = 10;
const MAX_SCORE: u8 = 100;

pub fn is_critical(attribute: &str) -> bool {
    CRITICAL_ATTRIBUTES.contains(&attribute)
}

/// Reduce signals to a score in `0..=100`.
pub fn score(signal: &AggregatedSignal) -> u8 {
    let mut score = 0u8;

    if signal.local_matches > 0 {
        score = score.max(LOCAL_MATCH_SCORE);
    }

    if signal.external_positives.iter().any(|a| is_critical(a)) {
        score = score.max(CRITICAL_SCORE);
    } else if !signal.external_positives.is_empty() {
        score = score.max(FLAGGED_SCORE);
    }

    // Empty, never-used wallets are often created for a single scam.
    if signal.transaction_count == 0 && !signal.has_assets {
        score = score.max(DORMANT_SCORE);
    }

    if signal.transaction_count > ESTABLISHED_TX_THRESHOLD || signal.has_assets {
        score = score.saturating_sub(ESTABLISHED_DISCOUNT);
    }

    score.min(MAX_SCORE)
}

/// Score and label together.
pub fn evaluate(signal: &AggregatedSignal) -> RiskVerdict {
    RiskVerdict::from_score(score(signal))
}
