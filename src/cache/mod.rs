//! Time-bounded caching subsystem.
//!
//! # Data Flow
//! ```text
//! startup
//!     → TtlCache::new(cache.max_entries)
//!     → cloned into each source client (shared entries)
//!
//! source fetch
//!     → get(key) hit → return typed value
//!     → miss → remote call → set(key, value, ttl) on success only
//! ```
//!
//! # Design Decisions
//! - Process-local and lossy: a restart is a full miss, never an error
//! - Backed by moka with LRU eviction; per-entry deadlines via `Expiry`
//! - One explicitly constructed instance, no global state

pub mod ttl;

pub use ttl::TtlCache;
