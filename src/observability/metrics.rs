//! Metrics collection and exposition.
//!
//! # Metrics
//! - `plugin_host_requests_total` (counter): requests by method, status
//! - `plugin_host_request_duration_seconds` (histogram): latency distribution
//! - `plugin_host_plugin_loads_total` (counter): load outcomes by plugin
//!
//! # Design Decisions
//! - Recorder is only installed when enabled in config
//! - Labels kept low-cardinality (no raw paths)

use std::net::SocketAddr;
use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "plugin_host_requests_total";
pub const REQUEST_DURATION: &str = "plugin_host_request_duration_seconds";
pub const PLUGIN_LOADS_TOTAL: &str = "plugin_host_plugin_loads_total";

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let status = status.to_string();
    metrics::counter!(
        REQUESTS_TOTAL,
        "method" => method.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    metrics::histogram!(
        REQUEST_DURATION,
        "method" => method.to_string(),
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_plugin_load(plugin: &str, outcome: &'static str) {
    metrics::counter!(
        PLUGIN_LOADS_TOTAL,
        "plugin" => plugin.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Middleware recording count and latency of every request.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();

    let response = next.run(request).await;

    record_request(&method, response.status().as_u16(), start);
    response
}
