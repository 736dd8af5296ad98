//! # Observability
//!
//! Prometheus metrics for the lease handlers. Tracing spans are emitted
//! inline by the handlers and providers.

pub mod metrics;
