//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the risk service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RiskConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Cross-origin settings for browser clients.
    pub cors: CorsConfig,

    /// Rate limiting configuration for `/api/*`.
    pub rate_limit: RateLimitConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Shared source cache sizing.
    pub cache: CacheConfig,

    /// Balance/activity source (Helius).
    pub helius: HeliusConfig,

    /// Reputation source (GoPlus).
    pub goplus: GoPlusConfig,

    /// SQLite persistence.
    pub storage: StorageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Exact origins allowed to call the API. `"*"` allows any origin.
    pub allowed_origins: Vec<String>,

    /// Allow `chrome-extension://` origins regardless of the list above.
    pub allow_browser_extensions: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allow_browser_extensions: true,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Requests allowed per client within one window.
    pub requests_per_window: u32,

    /// Window length in seconds.
    pub window_secs: u64,

    /// Key clients by the first `X-Forwarded-For` hop instead of the peer IP.
    pub trust_proxy: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_window: 120,
            window_secs: 60,
            trust_proxy: true,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Inbound request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Per-call timeout for every outbound source request in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_secs: 10,
        }
    }
}

/// Source cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of live entries before LRU eviction.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_entries: 500 }
    }
}

/// Helius balance/activity source.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HeliusConfig {
    /// API key. Empty disables the source.
    pub api_key: String,

    /// API base URL.
    pub base_url: String,

    /// Number of recent transactions requested.
    pub transaction_limit: u32,

    /// Cache lifetime of transactions and balances in seconds.
    pub cache_ttl_secs: u64,
}

impl Default for HeliusConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.helius.xyz".to_string(),
            transaction_limit: 50,
            cache_ttl_secs: 30,
        }
    }
}

impl HeliusConfig {
    /// True when an API key is configured.
    pub fn enabled(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// GoPlus reputation source.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GoPlusConfig {
    /// Application key used in the token handshake.
    pub app_key: String,

    /// Application secret used in the token handshake.
    pub app_secret: String,

    /// API base URL.
    pub base_url: String,

    /// Chain identifier sent with address lookups.
    pub chain_id: String,

    /// Access token cache lifetime in seconds. Tokens are valid for one hour.
    pub token_ttl_secs: u64,

    /// Report cache lifetime in seconds.
    pub report_ttl_secs: u64,
}

impl Default for GoPlusConfig {
    fn default() -> Self {
        Self {
            app_key: String::new(),
            app_secret: String::new(),
            base_url: "https://api.gopluslabs.io".to_string(),
            chain_id: "solana".to_string(),
            token_ttl_secs: 55 * 60,
            report_ttl_secs: 60,
        }
    }
}

/// SQLite persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file path.
    pub sqlite_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            sqlite_file: "data.db".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}
