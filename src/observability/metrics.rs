//! Metrics collection and exposition.
//!
//! # Metrics
//! - `slimjpg_optimizations_total` (counter): optimizations by outcome
//!   (`optimized`, `unchanged`, `failed`)
//! - `slimjpg_optimization_duration_seconds` (histogram): optimizer wall time
//! - `slimjpg_saved_bytes_total` (counter): bytes saved by shrinking uploads
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::optimizer::OptimizationResult;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one optimizer call.
pub fn record_optimization(outcome: &'static str, result: &OptimizationResult) {
    metrics::counter!("slimjpg_optimizations_total", "outcome" => outcome).increment(1);
    metrics::histogram!("slimjpg_optimization_duration_seconds").record(result.elapsed.as_secs_f64());
    if result.saved_bytes > 0 {
        metrics::counter!("slimjpg_saved_bytes_total").increment(result.saved_bytes as u64);
    }
}
