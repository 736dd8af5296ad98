//! # Lease Metrics
//!
//! Metrics for lease renewals and revocations.

use crate::observability::metrics::registry::REGISTRY;
use anyhow::Result;
use prometheus::{IntCounter, IntCounterVec};
use std::sync::LazyLock;

static LEASE_RENEWALS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "nomad_lease_renewals_total",
        "Total number of successful token lease renewals",
    )
    .expect("Failed to create LEASE_RENEWALS_TOTAL metric - this should never happen")
});

static LEASE_REVOCATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "nomad_lease_revocations_total",
            "Total number of token lease revocations by outcome",
        ),
        &["outcome"],
    )
    .expect("Failed to create LEASE_REVOCATIONS_TOTAL metric - this should never happen")
});

static LEASE_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "nomad_lease_errors_total",
            "Total number of lease handler errors by operation and reason",
        ),
        &["operation", "reason"],
    )
    .expect("Failed to create LEASE_ERRORS_TOTAL metric - this should never happen")
});

pub(crate) fn register_lease_metrics() -> Result<()> {
    REGISTRY.register(Box::new(LEASE_RENEWALS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(LEASE_REVOCATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(LEASE_ERRORS_TOTAL.clone()))?;
    Ok(())
}

pub fn increment_lease_renewals() {
    LEASE_RENEWALS_TOTAL.inc();
}

/// `outcome` is one of `revoked`, `already_revoked`, `failed`
pub fn increment_lease_revocations(outcome: &str) {
    LEASE_REVOCATIONS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn increment_lease_errors(operation: &str, reason: &str) {
    LEASE_ERRORS_TOTAL
        .with_label_values(&[operation, reason])
        .inc();
}
