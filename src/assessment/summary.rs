//! Human-readable one-line summary.

use crate::scoring::RiskVerdict;
use crate::sources::{ActivityReport, ReputationReport, SourceSlot};

pub const SEPARATOR: &str = " · ";

/// Render the summary line, e.g. `Local: 1 · Helius: off · GoPlus: off · Risk: High (90)`.
pub fn render(
    local_matches: usize,
    activity: &ActivityReport,
    reputation: Option<&SourceSlot<ReputationReport>>,
    verdict: RiskVerdict,
) -> String {
    let mut parts = Vec::with_capacity(5);

    if local_matches > 0 {
        parts.push(format!("Local: {}", local_matches));
    }

    if activity.is_disabled() {
        parts.push("Helius: off".to_string());
    } else {
        let tx = match &activity.transactions {
            SourceSlot::Ready(list) => list.len().to_string(),
            SourceSlot::Failed(_) => "error".to_string(),
            SourceSlot::Disabled => "off".to_string(),
        };
        let bal = match &activity.balances {
            SourceSlot::Ready(b) if b.has_assets() => "assets",
            SourceSlot::Ready(_) => "none",
            SourceSlot::Failed(_) => "error",
            SourceSlot::Disabled => "off",
        };
        parts.push(format!("Helius TX: {}", tx));
        parts.push(format!("Helius Bal: {}", bal));
    }

    let goplus = match reputation {
        None | Some(SourceSlot::Disabled) => "GoPlus: off".to_string(),
        Some(SourceSlot::Failed(_)) => "GoPlus: error".to_string(),
        Some(SourceSlot::Ready(report)) => match report.positives().len() {
            0 => "GoPlus: 0".to_string(),
            n => format!("GoPlus: flags {}", n),
        },
    };
    parts.push(goplus);

    parts.push(format!("Risk: {} ({})", verdict.label, verdict.score));
    parts.join(SEPARATOR)
}
