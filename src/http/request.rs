//! Request identity and request bodies.
//!
//! # Responsibilities
//! - Generate a UUID v4 request ID when the client did not send one
//! - Open one tracing span per request carrying that ID
//! - Decode and normalize API request bodies

use axum::body::Body;
use axum::http::{HeaderValue, Request};
use serde::Deserialize;
use serde_json::Value;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::address::SolanaAddress;
use crate::storage::{NewBlacklistEntry, Page};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Issues a fresh UUID v4 for every request lacking `x-request-id`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Span for one request, tagged with its ID.
pub fn request_span(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}

/// `POST /api/check` body.
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub address: String,
    #[serde(rename = "useGoPlus", default)]
    pub use_goplus: bool,
}

/// `POST /api/blacklist` body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpsertRequest {
    pub address: String,
    pub reason: Option<String>,
    pub source: Option<String>,
}

/// `POST /api/blacklist/import` body. Rows stay untyped until [`import_row`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ImportRequest {
    pub addresses: Value,
}

/// `limit` / `offset` query, kept as text so bad numbers fall back to defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl PageQuery {
    pub fn page(&self, default_limit: u32, max_limit: u32) -> Page {
        Page::from_query(self.limit.as_deref(), self.offset.as_deref(), default_limit, max_limit)
    }
}

fn text(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty())
}

/// Normalize one heterogeneous import row.
///
/// Accepts an object (`address`, `pubkey` or `wallet`, plus optional
/// `reason` and `source`), an array whose first element is the address, or
/// a bare string. Values are trimmed. Returns `None` for rows without a
/// valid address.
pub fn import_row(row: &Value) -> Option<NewBlacklistEntry> {
    let (address, reason, source) = match row {
        Value::Object(fields) => (
            ["address", "pubkey", "wallet"]
                .iter()
                .find_map(|k| text(fields.get(*k))),
            text(fields.get("reason")),
            text(fields.get("source")),
        ),
        Value::Array(items) => (text(items.first()), None, None),
        Value::String(s) => (Some(s.as_str()), None, None),
        _ => (None, None, None),
    };

    let address = SolanaAddress::parse(address?.trim()).ok()?;
    Some(NewBlacklistEntry {
        address,
        reason: reason.unwrap_or_default().to_string(),
        source: source.unwrap_or("import").to_string(),
    })
}
