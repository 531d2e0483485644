//! External source integration subsystem.
//!
//! # Data Flow
//! ```text
//! address
//!     → helius.rs (transactions ∥ balances, cache-aware)
//!     → goplus.rs (auth.rs token handshake → address_security report)
//!     → types.rs (typed schemas, SourceSlot error markers)
//! ```
//!
//! # Design Decisions
//! - Every outbound call carries the shared client's per-call timeout
//! - A timeout, transport error, bad status or unknown body shape becomes an
//!   error marker in that source's slot; only reputation auth failures escape
//! - Credentials never appear in logs

pub mod auth;
pub mod goplus;
pub mod helius;
pub mod types;

use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::cache::TtlCache;
use crate::config::RiskConfig;

pub use auth::{sign_request, AuthError};
pub use goplus::GoPlusClient;
pub use helius::HeliusClient;
pub use types::{
    ActivityReport, AttributeFlag, BalanceSummary, CachedValue, ReputationReport, SourceError,
    SourceSlot, TokenHolding, Transaction,
};

/// Cache shared by every source client.
pub type SourceCache = TtlCache<CachedValue>;

/// Error building the source clients at startup.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid base URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("base URL cannot carry a path: {0}")]
    BaseUrl(String),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Both source clients, built from one config and one cache.
#[derive(Clone, Debug)]
pub struct SourceClients {
    pub helius: HeliusClient,
    pub goplus: GoPlusClient,
}

impl SourceClients {
    pub fn from_config(config: &RiskConfig, cache: SourceCache) -> Result<Self, SetupError> {
        let http = build_http_client(Duration::from_secs(config.timeouts.upstream_secs))?;
        Ok(Self {
            helius: HeliusClient::new(config.helius.clone(), http.clone(), cache.clone())?,
            goplus: GoPlusClient::new(&config.goplus, http, cache)?,
        })
    }
}

/// Outbound HTTP client with an explicit per-call deadline.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, SetupError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(concat!("address-risk/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Send `request` and decode a successful JSON body into `T`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, SourceError> {
    let response = request
        .send()
        .await
        .map_err(|e| SourceError::from_reqwest(&e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status(status.as_u16()));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| SourceError::from_reqwest(&e))?;
    serde_json::from_slice(&body).map_err(|e| SourceError::UnexpectedShape(e.to_string()))
}
