//! # Lease Error Types
//!
//! Defines the errors surfaced by the renewal and revocation handlers, with
//! classification of transient vs permanent failures.

use crate::provider::nomad::ClientError;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors returned to the host by the lease lifecycle handlers
#[derive(Debug, Error)]
pub enum LeaseError {
    /// Storage lookup failed (policy or access configuration)
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Nomad API call failed and was not classified as already revoked.
    /// The status code and body are preserved for upstream logging.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The client factory returned no client and no error
    #[error("error getting Nomad client")]
    ClientUnavailable,

    /// Required internal data is absent from the lease
    #[error("{key} is missing on the lease")]
    MissingMetadata { key: &'static str },

    /// Required internal data is present but has the wrong type
    #[error("unable to convert {key}")]
    MalformedMetadata { key: &'static str },

    /// Configuration rejected on write
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The request context was cancelled before the call completed
    #[error("request cancelled")]
    Cancelled,
}

impl LeaseError {
    /// Determine if the host may retry the operation later.
    ///
    /// Metadata errors indicate a corrupt or foreign secret and never resolve
    /// on their own.
    pub fn is_transient(&self) -> bool {
        match self {
            LeaseError::Storage(_) | LeaseError::ClientUnavailable | LeaseError::Cancelled => true,
            LeaseError::Client(e) => e.is_transient(),
            LeaseError::MissingMetadata { .. }
            | LeaseError::MalformedMetadata { .. }
            | LeaseError::InvalidConfig(_) => false,
        }
    }

    /// Get reason string for metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaseError::Storage(_) => "storage",
            LeaseError::Client(_) => "client",
            LeaseError::ClientUnavailable => "client_unavailable",
            LeaseError::MissingMetadata { .. } => "missing_metadata",
            LeaseError::MalformedMetadata { .. } => "malformed_metadata",
            LeaseError::InvalidConfig(_) => "invalid_config",
            LeaseError::Cancelled => "cancelled",
        }
    }
}
