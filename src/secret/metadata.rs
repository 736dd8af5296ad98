//! # Token Lease Metadata
//!
//! Typed view of the internal data stored with each token lease. Written
//! once at issuance, read back on revocation.

use crate::constants::ACCESSOR_ID_KEY;
use crate::error::LeaseError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInternalData {
    /// ACL token accessor ID, used to delete the token
    pub accessor_id: String,
}

impl TokenInternalData {
    pub fn new(accessor_id: impl Into<String>) -> Self {
        Self {
            accessor_id: accessor_id.into(),
        }
    }

    pub fn into_internal_data(self) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert(ACCESSOR_ID_KEY.to_string(), Value::String(self.accessor_id));
        data
    }

    pub fn from_internal_data(data: &Map<String, Value>) -> Result<Self, LeaseError> {
        accessor_id(data).map(Self::new)
    }
}

/// Read the accessor ID, distinguishing an absent key from a non-string value
pub fn accessor_id(data: &Map<String, Value>) -> Result<&str, LeaseError> {
    match data.get(ACCESSOR_ID_KEY) {
        None => Err(LeaseError::MissingMetadata {
            key: ACCESSOR_ID_KEY,
        }),
        Some(Value::String(accessor_id)) => Ok(accessor_id),
        Some(_) => Err(LeaseError::MalformedMetadata {
            key: ACCESSOR_ID_KEY,
        }),
    }
}
