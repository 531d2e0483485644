//! GoPlus access-token handshake.
//!
//! # Handshake
//! ```text
//! time = unix seconds
//! sign = hex(SHA1(app_key ∥ time ∥ app_secret))
//! POST /api/v1/token {app_key, time, sign} → result.access_token
//! ```
//!
//! Tokens live for 60 minutes upstream and are cached for less, so a cached
//! token is never presented after it expires. When the provider reports
//! `expires_in`, the cache lifetime is also held five minutes under it. Refresh is single-flight: tasks
//! that find the cache empty queue on one mutex and re-check the cache once
//! they hold it.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use sha1::{Digest, Sha1};
use thiserror::Error;
use tokio::sync::Mutex;
use url::Url;

use crate::observability::metrics;
use crate::sources::types::{CachedValue, Envelope, TokenResult};
use crate::sources::{read_json, SourceCache};

pub(crate) const TOKEN_CACHE_KEY: &str = "goplus:access_token";

/// Kept between the provider's stated lifetime and our cache deadline.
const EXPIRY_MARGIN: Duration = Duration::from_secs(300);

/// Failure to obtain a reputation-source access token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("GoPlus app_key/app_secret are missing")]
    MissingCredentials,

    #[error("GoPlus token error: {0}")]
    Exchange(String),

    #[error("GoPlus token error: no result.access_token ({0})")]
    MissingToken(String),
}

/// Application credentials for the handshake.
#[derive(Clone)]
pub struct Credentials {
    pub app_key: String,
    pub app_secret: String,
}

impl Credentials {
    /// Both halves must be non-empty.
    pub fn new(app_key: &str, app_secret: &str) -> Option<Self> {
        if app_key.is_empty() || app_secret.is_empty() {
            None
        } else {
            Some(Self {
                app_key: app_key.to_string(),
                app_secret: app_secret.to_string(),
            })
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_key", &self.app_key)
            .field("app_secret", &"<redacted>")
            .finish()
    }
}

/// Hex SHA-1 over `app_key ∥ time ∥ app_secret`, no separators.
pub fn sign_request(app_key: &str, time: u64, app_secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(app_key.as_bytes());
    hasher.update(time.to_string().as_bytes());
    hasher.update(app_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    app_key: &'a str,
    time: u64,
    sign: String,
}

/// Obtains and caches access tokens.
pub struct TokenProvider {
    http: reqwest::Client,
    token_url: Url,
    credentials: Option<Credentials>,
    cache: SourceCache,
    ttl: Duration,
    refresh: Mutex<()>,
}

impl TokenProvider {
    pub fn new(
        http: reqwest::Client,
        token_url: Url,
        credentials: Option<Credentials>,
        cache: SourceCache,
        ttl: Duration,
    ) -> Self {
        Self {
            http,
            token_url,
            credentials,
            cache,
            ttl,
            refresh: Mutex::new(()),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Return a cached token or perform the handshake.
    pub async fn access_token(&self) -> Result<String, AuthError> {
        if let Some(token) = self.cached() {
            return Ok(token);
        }

        let _guard = self.refresh.lock().await;
        // Another task may have finished the handshake while we waited.
        if let Some(token) = self.cached() {
            return Ok(token);
        }

        let credentials = self.credentials.as_ref().ok_or(AuthError::MissingCredentials)?;
        match self.exchange(credentials).await {
            Ok((token, expires_in)) => {
                let ttl = self.cache_ttl(expires_in);
                self.cache
                    .set(TOKEN_CACHE_KEY, CachedValue::AccessToken(token.clone()), ttl);
                tracing::info!(ttl_secs = ttl.as_secs(), "GoPlus access token refreshed");
                metrics::record_token_exchange("ok");
                Ok(token)
            }
            Err(e) => {
                tracing::warn!(error = %e, "GoPlus token exchange failed");
                metrics::record_token_exchange("error");
                Err(e)
            }
        }
    }

    fn cache_ttl(&self, expires_in: Option<u64>) -> Duration {
        match expires_in {
            Some(secs) => Duration::from_secs(secs).saturating_sub(EXPIRY_MARGIN).min(self.ttl),
            None => self.ttl,
        }
    }

    fn cached(&self) -> Option<String> {
        match self.cache.get(TOKEN_CACHE_KEY) {
            Some(CachedValue::AccessToken(token)) => Some(token),
            _ => None,
        }
    }

    async fn exchange(&self, credentials: &Credentials) -> Result<(String, Option<u64>), AuthError> {
        let time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let body = TokenRequest {
            app_key: &credentials.app_key,
            time,
            sign: sign_request(&credentials.app_key, time, &credentials.app_secret),
        };

        let envelope: Envelope<TokenResult> =
            read_json(self.http.post(self.token_url.clone()).json(&body))
                .await
                .map_err(|e| AuthError::Exchange(e.to_string()))?;

        let describe = envelope.describe();
        let result = envelope.result.unwrap_or_default();
        match result.access_token {
            Some(token) if !token.is_empty() => Ok((token, result.expires_in)),
            _ => Err(AuthError::MissingToken(describe)),
        }
    }
}
