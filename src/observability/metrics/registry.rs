//! # Metrics Registry
//!
//! Prometheus metrics registry setup and registration.

use anyhow::{Context, Result};
use prometheus::{Encoder, Registry, TextEncoder};
use std::sync::LazyLock;

/// Global Prometheus metrics registry
pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Register all metrics with the Prometheus registry
///
/// Prometheus Registry::register() takes ownership (Box<dyn Collector>),
/// so we clone the metrics. Since Prometheus metrics internally use Arc,
/// cloning is cheap (just increments a reference count).
///
/// # Errors
/// Returns an error if a metric is registered twice.
pub fn register_metrics() -> Result<()> {
    super::lease_metrics::register_lease_metrics()?;
    super::provider_metrics::register_provider_metrics()?;
    Ok(())
}

/// Encode all registered metrics in the Prometheus text exposition format
///
/// # Errors
/// Returns an error if encoding fails.
pub fn gather_metrics() -> Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&REGISTRY.gather(), &mut buffer)
        .context("Failed to encode metrics")?;
    String::from_utf8(buffer).context("Metrics output is not valid UTF-8")
}
