//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with every API handler
//! - Wire up middleware (request ID, tracing, timeout, body limit, CORS,
//!   security headers, rate limiting, metrics)
//! - Serve until the shutdown coordinator fires

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::assessment::Assessor;
use crate::config::RiskConfig;
use crate::http::handlers;
use crate::http::request::{request_span, UuidRequestId};
use crate::observability::metrics;
use crate::security::{self, RateLimiter};
use crate::sources::SourceClients;
use crate::storage::{BlacklistStore, Database, HistoryStore};

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub assessor: Assessor,
    pub blacklist: BlacklistStore,
    pub history: HistoryStore,
}

impl AppState {
    pub fn new(db: &Database, sources: SourceClients) -> Self {
        Self {
            assessor: Assessor::new(db, sources),
            blacklist: db.blacklist(),
            history: db.history(),
        }
    }
}

/// HTTP server for the risk API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &RiskConfig, state: AppState) -> Self {
        Self {
            router: build_router(config, state),
        }
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &RiskConfig, state: AppState) -> Router {
    let mut api = Router::new()
        .route("/api/check", post(handlers::check))
        .route(
            "/api/blacklist",
            get(handlers::list_blacklist).post(handlers::upsert_blacklist),
        )
        .route("/api/blacklist/import", post(handlers::import_blacklist))
        .route("/api/blacklist/{address}", delete(handlers::remove_blacklist))
        .route("/api/history", get(handlers::list_history));

    if config.rate_limit.enabled {
        let limiter = Arc::new(RateLimiter::new(&config.rate_limit));
        api = api.layer(middleware::from_fn_with_state(
            limiter,
            security::rate_limit_middleware,
        ));
    }

    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .merge(api)
        .route_layer(middleware::from_fn(track_metrics))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

    if config.security.enable_headers {
        router = security::headers::apply(router);
    }

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(security::cors_layer(&config.cors)),
    )
}

async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    metrics::record_request(&method, &route, response.status().as_u16(), start);
    response
}
