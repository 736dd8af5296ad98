//! # Constants
//!
//! Default values and storage keys shared across the crate.

/// Default Nomad HTTP API address (matches the Nomad CLI default)
pub const DEFAULT_NOMAD_ADDR: &str = "http://127.0.0.1:4646";

/// Default per-request timeout for Nomad API calls (seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Storage key holding the lease policy (`ttl` / `max_ttl`)
pub const LEASE_CONFIG_PATH: &str = "config/lease";

/// Storage key holding the Nomad access configuration
pub const ACCESS_CONFIG_PATH: &str = "config/access";

/// Secret type identifier registered with the host
pub const SECRET_TOKEN_TYPE: &str = "token";

/// Internal data key carrying the ACL token accessor ID
pub const ACCESSOR_ID_KEY: &str = "accessor_id";

/// Prefix of the Nomad response body returned when deleting an unknown token.
/// Nomad appends the accessor ID directly after it.
pub const NONEXISTENT_TOKENS_PREFIX: &str = "Cannot delete nonexistent tokens: ";

/// Default tracing filter for the CLI
pub const DEFAULT_LOG_FILTER: &str = "nomad_secrets_lease=info";
