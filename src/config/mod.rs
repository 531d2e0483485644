//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides: PORT, CORS_ORIGIN, credentials, SQLITE_FILE)
//!     → validation.rs (semantic checks)
//!     → RiskConfig (validated, immutable)
//!     → handed to each subsystem at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{resolve_config, ConfigError};
pub use schema::{
    CacheConfig, CorsConfig, GoPlusConfig, HeliusConfig, ListenerConfig, LogFormat,
    ObservabilityConfig, RateLimitConfig, RiskConfig, SecurityConfig, StorageConfig,
    TimeoutConfig,
};
