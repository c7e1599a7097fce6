//! Metrics collection and exposition.
//!
//! # Metrics
//! - `workbench_requests_total` (counter): requests by kind, status
//! - `workbench_request_duration_seconds` (histogram): latency by kind
//! - `workbench_channels_active` (gauge): live duplex channels
//! - `workbench_channel_messages_total` (counter): echoed messages by frame
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(kind: &'static str, status: u16, start: Instant) {
    counter!("workbench_requests_total", "kind" => kind, "status" => status.to_string())
        .increment(1);
    histogram!("workbench_request_duration_seconds", "kind" => kind)
        .record(start.elapsed().as_secs_f64());
}

pub fn channel_opened() {
    gauge!("workbench_channels_active").increment(1.0);
}

pub fn channel_closed() {
    gauge!("workbench_channels_active").decrement(1.0);
}

pub fn record_message(frame: &'static str) {
    counter!("workbench_channel_messages_total", "frame" => frame).increment(1);
}
