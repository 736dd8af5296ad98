//! # Metrics Module
//!
//! Prometheus metrics organized by responsibility.
//!
//! ## Sub-modules
//!
//! - `registry` - Metrics registry setup, registration and text export
//! - `lease_metrics` - Renewal and revocation outcomes
//! - `provider_metrics` - Nomad API request metrics

pub mod lease_metrics;
pub mod provider_metrics;
pub mod registry;

pub use lease_metrics::*;
pub use provider_metrics::*;
pub use registry::*;
