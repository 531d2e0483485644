//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use address_risk::config::RiskConfig;
use address_risk::http::build_router;
use address_risk::lifecycle;
use address_risk::storage::Database;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const CLEAN: &str = "B8Y1dERnVNoUUXeXA4NaCHiB9htcukMSkfHrFsTMHA7h";
pub const OTHER: &str = "MszS2N8CT1MV9byX8FKFnrUpkmASSeR5Fmji19ushw1";
pub const THIRD: &str = "So11111111111111111111111111111111111111112";

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{}", addr)
}

/// Call counter shared between a mock handler and the test body.
#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn hit(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Router plus its in-memory database.
pub fn test_app(config: &RiskConfig) -> (Router, Database) {
    let db = Database::open_in_memory().unwrap();
    let state = lifecycle::initialize_with(config, &db).unwrap();
    (build_router(config, state), db)
}

/// Config with rate limiting off so tests never trip the quota.
pub fn quiet_config() -> RiskConfig {
    let mut config = RiskConfig::default();
    config.rate_limit.enabled = false;
    config
}

pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
}

/// Send one request through the router and decode the JSON body.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, headers, body)
}
