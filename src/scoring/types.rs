//! Scoring inputs and outputs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Signals gathered for one address, reduced to what the score depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedSignal {
    /// Rows in the local blacklist for this address.
    pub local_matches: usize,
    /// Reputation attributes reported as true.
    pub external_positives: BTreeSet<String>,
    /// Recent transactions observed by the activity source.
    pub transaction_count: usize,
    /// Native balance or any token holding present.
    pub has_assets: bool,
}

/// Three-level risk label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLabel {
    Low,
    Medium,
    High,
}

impl RiskLabel {
    /// `score >= 70` is High, `40..70` is Medium, below 40 is Low.
    pub fn from_score(score: u8) -> Self {
        match score {
            70.. => RiskLabel::High,
            40..=69 => RiskLabel::Medium,
            _ => RiskLabel::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLabel::Low => "Low",
            RiskLabel::Medium => "Medium",
            RiskLabel::High => "High",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a label string that is none of Low/Medium/High.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown risk label '{0}'")]
pub struct UnknownLabel(pub String);

impl FromStr for RiskLabel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(RiskLabel::Low),
            "Medium" => Ok(RiskLabel::Medium),
            "High" => Ok(RiskLabel::High),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

/// Score paired with the label derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskVerdict {
    pub score: u8,
    pub label: RiskLabel,
}

impl RiskVerdict {
    pub fn from_score(score: u8) -> Self {
        Self {
            score,
            label: RiskLabel::from_score(score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_boundaries() {
        assert_eq!(RiskLabel::from_score(0), RiskLabel::Low);
        assert_eq!(RiskLabel::from_score(39), RiskLabel::Low);
        assert_eq!(RiskLabel::from_score(40), RiskLabel::Medium);
        assert_eq!(RiskLabel::from_score(69), RiskLabel::Medium);
        assert_eq!(RiskLabel::from_score(70), RiskLabel::High);
        assert_eq!(RiskLabel::from_score(100), RiskLabel::High);
        assert_eq!(RiskLabel::from_score(255), RiskLabel::High);
    }

    #[test]
    fn test_label_round_trips_through_text() {
        for label in [RiskLabel::Low, RiskLabel::Medium, RiskLabel::High] {
            assert_eq!(label.as_str().parse::<RiskLabel>(), Ok(label));
            assert_eq!(serde_json::to_string(&label).unwrap(), format!("\"{label}\""));
        }
        assert!("high".parse::<RiskLabel>().is_err());
    }
}
