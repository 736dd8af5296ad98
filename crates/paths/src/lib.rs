//! Shared Nomad API path definitions
//!
//! This crate centralizes the Nomad HTTP API paths so the ACL client and the
//! mock server used in integration tests agree on them.
//!
//! ## Route Constants
//!
//! Route constants are provided for Axum routes, which require static string literals.
//! These constants are validated against the segment helpers in tests.

pub mod nomad;

pub use nomad::AclOperation;
