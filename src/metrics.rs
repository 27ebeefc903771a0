//! Prometheus metrics for upstream latency and page traffic.
//!
//! This module provides metrics for:
//! - Upstream EMY fetch latency
//! - Upstream fetch outcomes, labelled by failure kind
//! - Page shell renders, labelled by component

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Upstream fetch latency metric name.
pub const METRIC_UPSTREAM_FETCH_LATENCY: &str = "upstream_fetch_latency_ms";
/// Successful upstream fetches counter metric name.
pub const METRIC_UPSTREAM_FETCH_SUCCESS: &str = "upstream_fetch_success_total";
/// Failed upstream fetches counter metric name.
pub const METRIC_UPSTREAM_FETCH_FAILURE: &str = "upstream_fetch_failure_total";
/// Page renders counter metric name.
pub const METRIC_PAGE_RENDERS: &str = "page_renders_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_UPSTREAM_FETCH_LATENCY,
        "EMY upstream fetch latency in milliseconds"
    );
    describe_counter!(
        METRIC_UPSTREAM_FETCH_SUCCESS,
        "Total number of successful EMY upstream fetches"
    );
    describe_counter!(
        METRIC_UPSTREAM_FETCH_FAILURE,
        "Total number of failed EMY upstream fetches"
    );
    describe_counter!(METRIC_PAGE_RENDERS, "Total number of page shells rendered");

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder and return its render handle.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Record upstream fetch latency.
pub fn record_upstream_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_UPSTREAM_FETCH_LATENCY).record(latency_ms);
}

/// Increment successful upstream fetch counter.
pub fn inc_upstream_success() {
    counter!(METRIC_UPSTREAM_FETCH_SUCCESS).increment(1);
}

/// Increment failed upstream fetch counter.
pub fn inc_upstream_failure(kind: &'static str) {
    counter!(METRIC_UPSTREAM_FETCH_FAILURE, "kind" => kind).increment(1);
}

/// Increment page render counter.
pub fn inc_page_renders(component: &'static str) {
    counter!(METRIC_PAGE_RENDERS, "component" => component).increment(1);
}
