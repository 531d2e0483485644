//! GoPlus reputation client.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use url::Url;

use crate::address::SolanaAddress;
use crate::config::GoPlusConfig;
use crate::observability::metrics;
use crate::sources::auth::{AuthError, Credentials, TokenProvider};
use crate::sources::types::{CachedValue, Envelope, ReputationReport, SourceError, SourceSlot};
use crate::sources::{read_json, SetupError, SourceCache};

const SOURCE: &str = "goplus";

/// Reputation source client. Clones share the token provider and cache.
#[derive(Clone)]
pub struct GoPlusClient {
    http: reqwest::Client,
    base_url: Url,
    chain_id: String,
    report_ttl: Duration,
    tokens: Arc<TokenProvider>,
    cache: SourceCache,
}

impl GoPlusClient {
    pub fn new(config: &GoPlusConfig, http: reqwest::Client, cache: SourceCache) -> Result<Self, SetupError> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(SetupError::BaseUrl(config.base_url.clone()));
        }
        let token_url = join(&base_url, &["api", "v1", "token"]);
        let tokens = TokenProvider::new(
            http.clone(),
            token_url,
            Credentials::new(&config.app_key, &config.app_secret),
            cache.clone(),
            Duration::from_secs(config.token_ttl_secs),
        );

        Ok(Self {
            http,
            base_url,
            chain_id: config.chain_id.clone(),
            report_ttl: Duration::from_secs(config.report_ttl_secs),
            tokens: Arc::new(tokens),
            cache,
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.tokens.has_credentials()
    }

    /// Fetch the flagged-attribute report for `address`.
    ///
    /// Only authentication failures are returned as errors; transport and
    /// schema failures come back as [`SourceSlot::Failed`].
    pub async fn fetch(&self, address: &SolanaAddress) -> Result<SourceSlot<ReputationReport>, AuthError> {
        let key = format!("goplus:{}", address);
        if let Some(CachedValue::Report(report)) = self.cache.get(&key) {
            tracing::debug!(address = %address, "Reputation served from cache");
            metrics::record_source_fetch(SOURCE, "cache_hit");
            return Ok(SourceSlot::Ready(report));
        }

        let token = self.tokens.access_token().await?;
        let url = join(&self.base_url, &["api", "v1", "address_security", address.as_str()]);
        let request = self.http.get(url).query(&[
            ("chain_id", self.chain_id.as_str()),
            ("access_token", token.as_str()),
        ]);

        let result = read_json::<Envelope<Map<String, Value>>>(request)
            .await
            .and_then(|envelope| match envelope.result {
                Some(attributes) => Ok(ReputationReport::from_attributes(attributes)),
                None => Err(SourceError::UnexpectedShape(envelope.describe())),
            });

        match &result {
            Ok(report) => {
                tracing::debug!(address = %address, positives = report.positives().len(), "GoPlus report fetched");
                metrics::record_source_fetch(SOURCE, "ok");
                self.cache.set(key, CachedValue::Report(report.clone()), self.report_ttl);
            }
            Err(e) => {
                tracing::warn!(address = %address, error = %e, "GoPlus report failed");
                metrics::record_source_fetch(SOURCE, e.outcome());
            }
        }

        Ok(result.into())
    }
}

fn join(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

impl std::fmt::Debug for GoPlusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoPlusClient")
            .field("base_url", &self.base_url.as_str())
            .field("chain_id", &self.chain_id)
            .field("has_credentials", &self.has_credentials())
            .finish()
    }
}
