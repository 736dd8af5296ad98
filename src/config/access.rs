//! # Nomad Access Configuration
//!
//! Address, ACL token and TLS material used to reach the Nomad cluster,
//! persisted under `config/access`.

use crate::constants::ACCESS_CONFIG_PATH;
use crate::error::LeaseError;
use crate::storage::{Storage, StorageEntry};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Stored Nomad access configuration
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct AccessConfig {
    /// Nomad HTTP API address, e.g. `https://nomad.example.com:4646`
    pub address: String,
    /// Management token used to delete ACL tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// CA certificate (PEM) used to verify the Nomad server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<String>,
    /// Client certificate (PEM) for mutual TLS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_cert: Option<String>,
    /// Client private key (PEM) for mutual TLS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_key: Option<String>,
}

impl std::fmt::Debug for AccessConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessConfig")
            .field("address", &self.address)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("ca_cert", &self.ca_cert.is_some())
            .field("client_cert", &self.client_cert.is_some())
            .field("client_key", &self.client_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AccessConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            token: None,
            ca_cert: None,
            client_cert: None,
            client_key: None,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Check the configuration is usable before persisting it
    pub fn validate(&self) -> Result<(), String> {
        if self.address.trim().is_empty() {
            return Err("address must not be empty".to_string());
        }
        if self.client_cert.is_some() != self.client_key.is_some() {
            return Err("client_cert and client_key must be provided together".to_string());
        }
        Ok(())
    }
}

/// Read the stored access configuration; `None` when never configured
pub async fn read_access_config(storage: &dyn Storage) -> Result<Option<AccessConfig>, LeaseError> {
    match storage.get(ACCESS_CONFIG_PATH).await? {
        Some(entry) => Ok(Some(entry.decode_json()?)),
        None => Ok(None),
    }
}

pub async fn write_access_config(
    storage: &dyn Storage,
    config: &AccessConfig,
) -> Result<(), LeaseError> {
    config.validate().map_err(LeaseError::InvalidConfig)?;
    storage
        .put(StorageEntry::json(ACCESS_CONFIG_PATH, config)?)
        .await?;
    Ok(())
}

pub async fn delete_access_config(storage: &dyn Storage) -> Result<(), LeaseError> {
    storage.delete(ACCESS_CONFIG_PATH).await?;
    Ok(())
}
