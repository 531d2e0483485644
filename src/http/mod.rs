//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, span, body decoding)
//!     → handlers.rs (assessment, blacklist, history)
//!     → response.rs ({ok, ...} envelopes, error statuses)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{build_router, AppState, HttpServer};
