//! Helius balance/activity client.
//!
//! # Responsibilities
//! - Fetch recent transactions and current balances for an address
//! - Issue both calls concurrently; each failure only affects its own field
//! - Serve from cache only when both halves are cached
//! - Short-circuit without network when no API key is configured

use std::time::Duration;

use url::Url;

use crate::address::SolanaAddress;
use crate::config::HeliusConfig;
use crate::observability::metrics;
use crate::sources::types::{ActivityReport, BalanceSummary, CachedValue, SourceError, SourceSlot, Transaction};
use crate::sources::{read_json, SetupError, SourceCache};

const SOURCE: &str = "helius";

/// Balance/activity source client.
#[derive(Clone)]
pub struct HeliusClient {
    http: reqwest::Client,
    base_url: Url,
    config: HeliusConfig,
    cache: SourceCache,
}

impl HeliusClient {
    pub fn new(config: HeliusConfig, http: reqwest::Client, cache: SourceCache) -> Result<Self, SetupError> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(SetupError::BaseUrl(config.base_url.clone()));
        }
        Ok(Self {
            http,
            base_url,
            config,
            cache,
        })
    }

    /// True when an API key is configured.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled()
    }

    /// Fetch transactions and balances. Never fails as a whole.
    pub async fn fetch(&self, address: &SolanaAddress) -> ActivityReport {
        if !self.is_enabled() {
            return ActivityReport::disabled();
        }

        let tx_key = format!("helius:tx:{}", address);
        let bal_key = format!("helius:bal:{}", address);

        if let (Some(CachedValue::Transactions(transactions)), Some(CachedValue::Balances(balances))) =
            (self.cache.get(&tx_key), self.cache.get(&bal_key))
        {
            tracing::debug!(address = %address, "Activity served from cache");
            metrics::record_source_fetch(SOURCE, "cache_hit");
            return ActivityReport {
                transactions: SourceSlot::Ready(transactions),
                balances: SourceSlot::Ready(balances),
            };
        }

        let (transactions, balances) =
            tokio::join!(self.fetch_transactions(address), self.fetch_balances(address));

        let ttl = Duration::from_secs(self.config.cache_ttl_secs);
        if let Ok(list) = &transactions {
            self.cache.set(tx_key, CachedValue::Transactions(list.clone()), ttl);
        }
        if let Ok(summary) = &balances {
            self.cache.set(bal_key, CachedValue::Balances(summary.clone()), ttl);
        }

        ActivityReport {
            transactions: transactions.into(),
            balances: balances.into(),
        }
    }

    async fn fetch_transactions(&self, address: &SolanaAddress) -> Result<Vec<Transaction>, SourceError> {
        let url = self.address_url(address, "transactions")?;
        let request = self.http.get(url).query(&[
            ("api-key", self.config.api_key.clone()),
            ("limit", self.config.transaction_limit.to_string()),
        ]);
        let result = read_json::<Vec<Transaction>>(request).await;
        observe(address, "transactions", &result);
        result
    }

    async fn fetch_balances(&self, address: &SolanaAddress) -> Result<BalanceSummary, SourceError> {
        let url = self.address_url(address, "balances")?;
        let request = self.http.get(url).query(&[("api-key", self.config.api_key.as_str())]);
        let result = read_json::<BalanceSummary>(request).await;
        observe(address, "balances", &result);
        result
    }

    fn address_url(&self, address: &SolanaAddress, resource: &str) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::Transport("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(["v0", "addresses", address.as_str(), resource]);
        Ok(url)
    }
}

fn observe<T>(address: &SolanaAddress, call: &'static str, result: &Result<T, SourceError>) {
    match result {
        Ok(_) => {
            tracing::debug!(address = %address, call, "Helius call succeeded");
            metrics::record_source_fetch(SOURCE, "ok");
        }
        Err(e) => {
            // The API key travels in the query string, so only the error is logged.
            tracing::warn!(address = %address, call, error = %e, "Helius call failed");
            metrics::record_source_fetch(SOURCE, e.outcome());
        }
    }
}

impl std::fmt::Debug for HeliusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeliusClient")
            .field("base_url", &self.config.base_url)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TtlCache;

    fn client(api_key: &str, base_url: &str) -> HeliusClient {
        let config = HeliusConfig {
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
            ..HeliusConfig::default()
        };
        HeliusClient::new(config, reqwest::Client::new(), TtlCache::new(16)).unwrap()
    }

    fn address() -> SolanaAddress {
        SolanaAddress::parse("B8Y1dERnVNoUUXeXA4NaCHiB9htcukMSkfHrFsTMHA7h").unwrap()
    }

    #[tokio::test]
    async fn test_disabled_without_key() {
        // Unroutable base URL: any network attempt would fail the assertion below.
        let helius = client("", "http://127.0.0.1:9");
        let report = helius.fetch(&address()).await;
        assert!(report.is_disabled());
    }

    #[test]
    fn test_address_url() {
        let helius = client("k", "https://api.helius.xyz/");
        let url = helius.address_url(&address(), "balances").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.helius.xyz/v0/addresses/B8Y1dERnVNoUUXeXA4NaCHiB9htcukMSkfHrFsTMHA7h/balances"
        );
    }

    #[tokio::test]
    async fn test_served_from_cache_when_both_halves_present() {
        let helius = client("k", "http://127.0.0.1:9");
        let addr = address();
        let ttl = Duration::from_secs(60);
        helius.cache.set(format!("helius:tx:{}", addr), CachedValue::Transactions(vec![]), ttl);
        helius.cache.set(
            format!("helius:bal:{}", addr),
            CachedValue::Balances(BalanceSummary { native_balance: 7, tokens: vec![] }),
            ttl,
        );

        let report = helius.fetch(&addr).await;
        assert_eq!(report.transactions, SourceSlot::Ready(vec![]));
        assert!(report.has_assets());
    }

    #[tokio::test]
    async fn test_partial_cache_refetches_both() {
        let helius = client("k", "http://127.0.0.1:9");
        let addr = address();
        helius.cache.set(
            format!("helius:tx:{}", addr),
            CachedValue::Transactions(vec![]),
            Duration::from_secs(60),
        );

        // Port 9 (discard) refuses connections, so both halves fail.
        let report = helius.fetch(&addr).await;
        assert!(report.transactions.is_failed());
        assert!(report.balances.is_failed());
    }
}
