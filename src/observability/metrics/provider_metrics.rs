//! # Provider Metrics
//!
//! Metrics for Nomad API requests.

use crate::observability::metrics::registry::REGISTRY;
use anyhow::Result;
use prometheus::{HistogramVec, IntCounterVec};
use std::sync::LazyLock;
use std::time::Duration;

static NOMAD_REQUESTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "nomad_lease_api_requests_total",
            "Total number of Nomad API requests by operation and status",
        ),
        &["operation", "status"],
    )
    .expect("Failed to create NOMAD_REQUESTS_TOTAL metric - this should never happen")
});

static NOMAD_REQUEST_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "nomad_lease_api_request_duration_seconds",
            "Duration of Nomad API requests in seconds",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0]),
        &["operation"],
    )
    .expect("Failed to create NOMAD_REQUEST_DURATION metric - this should never happen")
});

pub(crate) fn register_provider_metrics() -> Result<()> {
    REGISTRY.register(Box::new(NOMAD_REQUESTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(NOMAD_REQUEST_DURATION.clone()))?;
    Ok(())
}

/// `status` is the HTTP status code, or `error` when no response was received
pub fn observe_nomad_request(operation: &str, status: &str, elapsed: Duration) {
    NOMAD_REQUESTS_TOTAL
        .with_label_values(&[operation, status])
        .inc();
    NOMAD_REQUEST_DURATION
        .with_label_values(&[operation])
        .observe(elapsed.as_secs_f64());
}
