//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (origin policy, preflight answers)
//!     → headers.rs (security response headers)
//!     → rate_limit.rs (per-client quota on /api/*)
//!     → handlers
//! ```
//!
//! # Design Decisions
//! - No trust in client input
//! - X-Forwarded-For is honored only when configured

pub mod cors;
pub mod headers;
pub mod rate_limit;

pub use cors::cors_layer;
pub use rate_limit::{rate_limit_middleware, RateLimiter};
