//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define probe metrics (checks, per-replica outcomes, latency)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `replica_probe_checks_total` (counter): checks by outcome (ok, resolve_error)
//! - `replica_probe_probes_total` (counter): per-replica probes by outcome (online, offline)
//! - `replica_probe_probe_duration_seconds` (histogram): per-replica latency
//! - `replica_probe_online_replicas` / `replica_probe_offline_replicas` (gauge): last check
//!
//! Recording is a no-op until a recorder is installed.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

use crate::health::{AggregateReport, ProbeResult};

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one replica probe.
pub fn record_probe(result: &ProbeResult) {
    let outcome = if result.is_online() { "online" } else { "offline" };
    metrics::counter!("replica_probe_probes_total", "outcome" => outcome).increment(1);
    metrics::histogram!("replica_probe_probe_duration_seconds")
        .record(result.response_time.as_secs_f64());
}

/// Record a completed check.
pub fn record_check(report: &AggregateReport) {
    metrics::counter!("replica_probe_checks_total", "outcome" => "ok").increment(1);
    metrics::gauge!("replica_probe_online_replicas").set(report.online_replicas as f64);
    metrics::gauge!("replica_probe_offline_replicas").set(report.offline_replicas as f64);
}

/// Record a check that failed before probing.
pub fn record_check_failure() {
    metrics::counter!("replica_probe_checks_total", "outcome" => "resolve_error").increment(1);
}
