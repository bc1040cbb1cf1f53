//! Metrics collection and exposition.
//!
//! # Metrics
//! - `waypoint_requests_total` (counter): requests by method, status
//! - `waypoint_request_duration_seconds` (histogram): latency by method
//! - `waypoint_routes_registered` (gauge): routes and mounts installed
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed exporter it is a no-op
//! - The Prometheus exporter serves its own scrape listener

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

const BUCKETS: [f64; 12] = [
    0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
];

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .set_buckets(&BUCKETS)?
        .with_http_listener(addr)
        .install()?;

    describe_metrics();
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

fn describe_metrics() {
    describe_counter!("waypoint_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "waypoint_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_gauge!("waypoint_routes_registered", "Routes and mounts installed");
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "waypoint_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("waypoint_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_route_registered() {
    gauge!("waypoint_routes_registered").increment(1.0);
}
