//! # Lease Policy
//!
//! TTL bounds applied to issued tokens, persisted under `config/lease`.
//! A missing entry means "no override"; the host then applies its own
//! system defaults.

use crate::constants::LEASE_CONFIG_PATH;
use crate::context::RequestContext;
use crate::error::LeaseError;
use crate::storage::{Storage, StorageEntry};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configured lease bounds. Zero durations defer to the host defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseConfig {
    #[serde(default, with = "humantime_serde")]
    pub ttl: Duration,
    #[serde(default, with = "humantime_serde")]
    pub max_ttl: Duration,
}

impl LeaseConfig {
    pub fn new(ttl: Duration, max_ttl: Duration) -> Self {
        Self { ttl, max_ttl }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.max_ttl.is_zero() && self.ttl > self.max_ttl {
            return Err(format!(
                "ttl ({}) cannot be greater than max_ttl ({})",
                humantime::format_duration(self.ttl),
                humantime::format_duration(self.max_ttl)
            ));
        }
        Ok(())
    }
}

/// Source of the lease policy consulted on renewal
#[async_trait]
pub trait LeasePolicyStore: Send + Sync {
    /// `Ok(None)` means no policy is configured, which is not an error
    async fn lease_config(
        &self,
        ctx: &RequestContext,
        storage: &dyn Storage,
    ) -> Result<Option<LeaseConfig>, LeaseError>;
}

/// Lease policy backed by the `config/lease` storage entry
#[derive(Debug, Clone, Copy, Default)]
pub struct StoredLeasePolicy;

impl StoredLeasePolicy {
    pub async fn write_lease_config(
        storage: &dyn Storage,
        config: &LeaseConfig,
    ) -> Result<(), LeaseError> {
        config.validate().map_err(LeaseError::InvalidConfig)?;
        storage
            .put(StorageEntry::json(LEASE_CONFIG_PATH, config)?)
            .await?;
        Ok(())
    }

    pub async fn delete_lease_config(storage: &dyn Storage) -> Result<(), LeaseError> {
        storage.delete(LEASE_CONFIG_PATH).await?;
        Ok(())
    }
}

#[async_trait]
impl LeasePolicyStore for StoredLeasePolicy {
    async fn lease_config(
        &self,
        ctx: &RequestContext,
        storage: &dyn Storage,
    ) -> Result<Option<LeaseConfig>, LeaseError> {
        match ctx.run(storage.get(LEASE_CONFIG_PATH)).await? {
            Some(entry) => Ok(Some(entry.decode_json()?)),
            None => Ok(None),
        }
    }
}
