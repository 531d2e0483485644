//! Source schemas and error definitions.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Failure of one external call, absorbed into that source's slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// Connection or protocol failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// No response within the per-call deadline.
    #[error("request timed out")]
    Timeout,

    /// Upstream answered with a non-success status.
    #[error("upstream returned status {0}")]
    Status(u16),

    /// Body did not match the expected schema.
    #[error("unexpected response: {0}")]
    UnexpectedShape(String),
}

impl SourceError {
    /// Classify a reqwest failure. Timeouts stay distinct but are absorbed the same way.
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else if let Some(status) = err.status() {
            SourceError::Status(status.as_u16())
        } else if err.is_decode() {
            SourceError::UnexpectedShape(err.to_string())
        } else {
            SourceError::Transport(err.to_string())
        }
    }

    pub fn outcome(&self) -> &'static str {
        match self {
            SourceError::Transport(_) => "transport_error",
            SourceError::Timeout => "timeout",
            SourceError::Status(_) => "status_error",
            SourceError::UnexpectedShape(_) => "unexpected_shape",
        }
    }
}

/// Result of one source field for one request.
///
/// Serializes as `null` when the source is disabled, the bare value when it
/// answered, and `{"error": "..."}` when it failed.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceSlot<T> {
    Disabled,
    Ready(T),
    Failed(SourceError),
}

impl<T> SourceSlot<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            SourceSlot::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SourceSlot::Failed(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SourceSlot<U> {
        match self {
            SourceSlot::Disabled => SourceSlot::Disabled,
            SourceSlot::Ready(value) => SourceSlot::Ready(f(value)),
            SourceSlot::Failed(err) => SourceSlot::Failed(err),
        }
    }
}

impl<T> From<Result<T, SourceError>> for SourceSlot<T> {
    fn from(result: Result<T, SourceError>) -> Self {
        match result {
            Ok(value) => SourceSlot::Ready(value),
            Err(err) => SourceSlot::Failed(err),
        }
    }
}

impl<T: Serialize> Serialize for SourceSlot<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SourceSlot::Disabled => serializer.serialize_none(),
            SourceSlot::Ready(value) => value.serialize(serializer),
            SourceSlot::Failed(err) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", &err.to_string())?;
                map.end()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helius
// ---------------------------------------------------------------------------

/// One parsed transaction from the activity source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_payer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Remaining provider fields (transfers, events, slot, ...) kept as evidence.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One SPL token holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenHolding {
    pub mint: String,
    #[serde(default)]
    pub amount: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_account: Option<String>,
}

/// Current holdings of an address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    /// Lamports held.
    #[serde(default, alias = "native")]
    pub native_balance: u64,
    #[serde(default)]
    pub tokens: Vec<TokenHolding>,
}

impl BalanceSummary {
    pub fn has_assets(&self) -> bool {
        self.native_balance > 0 || !self.tokens.is_empty()
    }
}

/// Combined activity-source result; each half fails independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityReport {
    pub transactions: SourceSlot<Vec<Transaction>>,
    pub balances: SourceSlot<BalanceSummary>,
}

impl ActivityReport {
    pub fn disabled() -> Self {
        Self {
            transactions: SourceSlot::Disabled,
            balances: SourceSlot::Disabled,
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(
            (&self.transactions, &self.balances),
            (SourceSlot::Disabled, SourceSlot::Disabled)
        )
    }

    /// Transactions seen; zero when the call failed or the source is off.
    pub fn transaction_count(&self) -> usize {
        self.transactions.ready().map(Vec::len).unwrap_or(0)
    }

    pub fn has_assets(&self) -> bool {
        self.balances.ready().map(BalanceSummary::has_assets).unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// GoPlus
// ---------------------------------------------------------------------------

/// Decoded value of one reputation attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeFlag {
    Absent,
    False,
    True,
}

impl AttributeFlag {
    /// Truthy values are `1`, `"1"`, `true` and any casing of `"true"`.
    pub fn decode(value: Option<&Value>) -> Self {
        let Some(value) = value else {
            return AttributeFlag::Absent;
        };
        let truthy = match value {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64() == Some(1.0),
            Value::String(s) => s == "1" || s.eq_ignore_ascii_case("true"),
            _ => false,
        };
        if truthy {
            AttributeFlag::True
        } else {
            AttributeFlag::False
        }
    }
}

/// Reputation report for one address.
#[derive(Debug, Clone, PartialEq)]
pub struct ReputationReport {
    raw: Map<String, Value>,
    flags: BTreeMap<String, AttributeFlag>,
}

impl ReputationReport {
    /// Decode every attribute once so downstream code only sees flags.
    pub fn from_attributes(raw: Map<String, Value>) -> Self {
        let flags = raw
            .iter()
            .map(|(name, value)| (name.clone(), AttributeFlag::decode(Some(value))))
            .collect();
        Self { raw, flags }
    }

    pub fn flag(&self, attribute: &str) -> AttributeFlag {
        self.flags.get(attribute).copied().unwrap_or(AttributeFlag::Absent)
    }

    /// Attribute names reported as true.
    pub fn positives(&self) -> BTreeSet<String> {
        self.flags
            .iter()
            .filter(|(_, flag)| **flag == AttributeFlag::True)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl Serialize for ReputationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("raw", &self.raw)?;
        map.serialize_entry("positives", &self.positives())?;
        map.end()
    }
}

/// GoPlus response envelope shared by every endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    pub result: Option<T>,
}

impl<T> Envelope<T> {
    pub fn describe(&self) -> String {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => format!("code {}: {}", code, message),
            (None, Some(message)) => message.clone(),
            (Some(code), None) => format!("code {}", code),
            (None, None) => "no result".to_string(),
        }
    }
}

/// Token endpoint result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResult {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

// ---------------------------------------------------------------------------
// Cache values
// ---------------------------------------------------------------------------

/// Every value the shared source cache holds.
#[derive(Debug, Clone)]
pub enum CachedValue {
    Transactions(Vec<Transaction>),
    Balances(BalanceSummary),
    AccessToken(String),
    Report(ReputationReport),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthy_decoding() {
        for v in [json!(1), json!("1"), json!(true), json!("true"), json!("TRUE"), json!(1.0)] {
            assert_eq!(AttributeFlag::decode(Some(&v)), AttributeFlag::True, "{v}");
        }
        for v in [json!(0), json!("0"), json!(false), json!("yes"), json!(null), json!(2), json!("")] {
            assert_eq!(AttributeFlag::decode(Some(&v)), AttributeFlag::False, "{v}");
        }
        assert_eq!(AttributeFlag::decode(None), AttributeFlag::Absent);
    }

    #[test]
    fn test_report_positives() {
        let raw = json!({
            "phishing_activities": "1",
            "stealing_attack": "0",
            "mixer": 1,
            "data_source": ""
        });
        let report = ReputationReport::from_attributes(raw.as_object().unwrap().clone());

        let positives: Vec<_> = report.positives().into_iter().collect();
        assert_eq!(positives, vec!["mixer".to_string(), "phishing_activities".to_string()]);
        assert_eq!(report.flag("stealing_attack"), AttributeFlag::False);
        assert_eq!(report.flag("fake_kyc"), AttributeFlag::Absent);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["raw"]["mixer"], json!(1));
        assert_eq!(value["positives"], json!(["mixer", "phishing_activities"]));
    }

    #[test]
    fn test_slot_serialization() {
        let disabled: SourceSlot<Vec<u8>> = SourceSlot::Disabled;
        let ready = SourceSlot::Ready(vec![1u8]);
        let failed: SourceSlot<Vec<u8>> = SourceSlot::Failed(SourceError::Status(503));

        assert_eq!(serde_json::to_value(&disabled).unwrap(), json!(null));
        assert_eq!(serde_json::to_value(&ready).unwrap(), json!([1]));
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"error": "upstream returned status 503"})
        );
    }

    #[test]
    fn test_balance_schema_accepts_both_native_spellings() {
        let a: BalanceSummary = serde_json::from_value(json!({"nativeBalance": 5, "tokens": []})).unwrap();
        let b: BalanceSummary = serde_json::from_value(json!({"native": 0})).unwrap();
        assert!(a.has_assets());
        assert!(!b.has_assets());

        let c: BalanceSummary = serde_json::from_value(json!({
            "tokens": [{"mint": "So11111111111111111111111111111111111111112", "amount": 3}]
        }))
        .unwrap();
        assert!(c.has_assets());
    }

    #[test]
    fn test_transaction_requires_signature() {
        assert!(serde_json::from_value::<Transaction>(json!({"type": "TRANSFER"})).is_err());
        let tx: Transaction =
            serde_json::from_value(json!({"signature": "abc", "type": "TRANSFER", "feePayer": "x"})).unwrap();
        assert_eq!(tx.kind.as_deref(), Some("TRANSFER"));
        assert_eq!(tx.fee_payer.as_deref(), Some("x"));
    }

    #[test]
    fn test_transaction_keeps_unmodelled_fields() {
        let upstream = json!({
            "signature": "abc",
            "type": "TRANSFER",
            "slot": 250_000_000u64,
            "transactionError": null,
            "nativeTransfers": [{"fromUserAccount": "a", "toUserAccount": "b", "amount": 5000}],
            "tokenTransfers": [],
            "events": {"nft": null}
        });
        let tx: Transaction = serde_json::from_value(upstream.clone()).unwrap();
        assert_eq!(tx.extra["nativeTransfers"][0]["amount"], json!(5000));
        assert_eq!(serde_json::to_value(&tx).unwrap(), upstream);
    }

    #[test]
    fn test_activity_report_counts() {
        let report = ActivityReport {
            transactions: SourceSlot::Failed(SourceError::Timeout),
            balances: SourceSlot::Ready(BalanceSummary { native_balance: 1, tokens: vec![] }),
        };
        assert_eq!(report.transaction_count(), 0);
        assert!(report.has_assets());
        assert!(!report.is_disabled());
        assert!(ActivityReport::disabled().is_disabled());
    }
}
