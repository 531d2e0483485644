//! Metrics collection and exposition.
//!
//! # Metrics
//! - `risk_http_requests_total` (counter): requests by method, route, status
//! - `risk_http_request_duration_seconds` (histogram): latency distribution
//! - `risk_assessments_total` (counter): completed assessments by label
//! - `risk_source_fetch_total` (counter): external fetches by source, outcome
//! - `risk_token_exchanges_total` (counter): GoPlus handshakes by outcome
//! - `risk_rate_limited_total` (counter): rejected requests
//! - `risk_cache_entries` (gauge): entries held by the source cache
//!
//! Without an installed recorder every call is a no-op, which keeps tests quiet.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    counter!(
        "risk_http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("risk_http_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_assessment(label: &'static str) {
    counter!("risk_assessments_total", "label" => label).increment(1);
}

pub fn record_source_fetch(source: &'static str, outcome: &'static str) {
    counter!("risk_source_fetch_total", "source" => source, "outcome" => outcome).increment(1);
}

pub fn record_token_exchange(outcome: &'static str) {
    counter!("risk_token_exchanges_total", "outcome" => outcome).increment(1);
}

pub fn record_rate_limited() {
    counter!("risk_rate_limited_total").increment(1);
}

pub fn record_cache_size(entries: usize) {
    gauge!("risk_cache_entries").set(entries as f64);
}
