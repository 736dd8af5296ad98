//! # Backend Configuration
//!
//! Configuration consumed by the lease handlers:
//!
//! - `nomad`: Nomad connection settings loaded from environment variables
//! - `access`: Nomad access configuration persisted in backend storage
//! - `lease`: Lease policy (`ttl` / `max_ttl`) persisted in backend storage
//!
//! All settings have sensible defaults and can be overridden via environment variables.

mod access;
mod lease;
mod nomad;

pub use access::{delete_access_config, read_access_config, write_access_config, AccessConfig};
pub use lease::{LeaseConfig, LeasePolicyStore, StoredLeasePolicy};
pub use nomad::NomadConfig;

/// Read environment variable or return default value
pub(crate) fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> T
where
    <T as std::str::FromStr>::Err: std::fmt::Debug,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Read a non-empty environment variable
pub(crate) fn env_var_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
