//! Per-client token bucket rate limiting for `/api/*`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;

use crate::config::RateLimitConfig;
use crate::http::response::ApiError;
use crate::observability::metrics;

/// Buckets idle this many windows are dropped on the next sweep.
const IDLE_WINDOWS: u32 = 2;
/// Sweep idle buckets once the table grows past this size.
const SWEEP_THRESHOLD: usize = 10_000;

/// A simple token bucket rate limiter.
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64) -> Self {
        Self {
            tokens: capacity,
            last_update: Instant::now(),
        }
    }

    fn try_acquire(&mut self, capacity: f64, refill_rate: f64) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Shared limiter state: one bucket per client key.
pub struct RateLimiter {
    buckets: DashMap<String, TokenBucket>,
    capacity: f64,
    refill_rate: f64,
    window: Duration,
    trust_proxy: bool,
}

impl RateLimiter {
    /// `requests_per_window` tokens, refilled evenly over `window_secs`.
    pub fn new(config: &RateLimitConfig) -> Self {
        let window = Duration::from_secs(config.window_secs.max(1));
        let capacity = f64::from(config.requests_per_window.max(1));
        Self {
            buckets: DashMap::new(),
            capacity,
            refill_rate: capacity / window.as_secs_f64(),
            window,
            trust_proxy: config.trust_proxy,
        }
    }

    /// Take one token for `key`. Returns false when the client is over quota.
    pub fn check(&self, key: &str) -> bool {
        if self.buckets.len() > SWEEP_THRESHOLD {
            self.sweep();
        }
        let mut bucket = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(self.capacity));
        bucket.try_acquire(self.capacity, self.refill_rate)
    }

    fn sweep(&self) {
        let idle = self.window * IDLE_WINDOWS;
        self.buckets
            .retain(|_, bucket| bucket.last_update.elapsed() < idle);
    }

    /// Client identity: first forwarded hop when trusted, else the peer IP.
    pub fn client_key(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
        if self.trust_proxy {
            let forwarded = headers
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty());
            if let Some(hop) = forwarded {
                return hop.to_string();
            }
        }
        peer.map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Middleware rejecting over-quota clients with 429.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let key = limiter.client_key(request.headers(), peer);

    if limiter.check(&key) {
        next.run(request).await
    } else {
        tracing::warn!(client = %key, path = %request.uri().path(), "Rate limit exceeded");
        metrics::record_rate_limited();
        ApiError::RateLimited.into_response()
    }
}
