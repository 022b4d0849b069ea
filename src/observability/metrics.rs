//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_http_requests_total` (counter): inbound requests by method, route, status
//! - `gateway_http_request_duration_seconds` (histogram): inbound latency
//! - `gateway_upstream_requests_total` (counter): store calls by operation, outcome
//! - `gateway_upstream_request_duration_seconds` (histogram): store call latency
//! - `gateway_upstream_retries_total` (counter): rate-limit retries by operation
//! - `gateway_degraded_fallbacks_total` (counter): aggregate reads answered empty
//!
//! Without an installed recorder every call is a no-op, so tests need no setup.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    counter!(
        "gateway_http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "gateway_http_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_call(operation: &'static str, outcome: &'static str, start: Instant) {
    counter!("gateway_upstream_requests_total", "operation" => operation, "outcome" => outcome)
        .increment(1);
    histogram!("gateway_upstream_request_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_retry(operation: &'static str) {
    counter!("gateway_upstream_retries_total", "operation" => operation).increment(1);
}

pub fn record_degraded_fallback(operation: &'static str) {
    counter!("gateway_degraded_fallbacks_total", "operation" => operation).increment(1);
}
