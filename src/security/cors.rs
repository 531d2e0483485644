//! Cross-origin policy for browser and extension clients.

use axum::http::{header, request::Parts, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

const EXTENSION_SCHEME: &str = "chrome-extension://";

/// Whether `origin` may call the API.
///
/// Requests without an `Origin` header never reach this check; the CORS
/// layer only acts on cross-origin requests.
pub fn origin_allowed(config: &CorsConfig, origin: &str) -> bool {
    config.allowed_origins.iter().any(|o| o == "*" || o == origin)
        || (config.allow_browser_extensions && origin.starts_with(EXTENSION_SCHEME))
}

pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let config = config.clone();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _: &Parts| {
            origin
                .to_str()
                .map(|origin| origin_allowed(&config, origin))
                .unwrap_or(false)
        }))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
        .expose_headers([HeaderName::from_static("x-request-id")])
}
