//! # Providers
//!
//! External credential systems the lease handlers delete tokens from.
//!
//! - `nomad`: Nomad ACL token API over HTTP
//!
//! The handlers only depend on `AclTokenClient` and `ClientFactory`; a new
//! provider implements those two traits.

pub mod nomad;

use crate::config::{read_access_config, NomadConfig};
use crate::context::RequestContext;
use crate::error::LeaseError;
use crate::storage::Storage;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub use nomad::{ClientError, NomadClient};

/// Deletes issued credentials from the system of record
#[async_trait]
pub trait AclTokenClient: Send + Sync {
    /// Delete the token identified by `accessor_id`
    async fn delete_token(&self, accessor_id: &str) -> Result<(), ClientError>;
}

/// Builds a client for a single request.
///
/// `Ok(None)` means no usable client could be produced without an
/// underlying error; callers must treat it as a failure of its own.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn client(
        &self,
        ctx: &RequestContext,
        storage: &dyn Storage,
    ) -> Result<Option<Arc<dyn AclTokenClient>>, LeaseError>;
}

/// Client factory reading `config/access` from storage, falling back to the
/// environment. A new client is built on every call.
#[derive(Debug, Clone, Default)]
pub struct StorageClientFactory {
    nomad: NomadConfig,
}

impl StorageClientFactory {
    pub fn new(nomad: NomadConfig) -> Self {
        Self { nomad }
    }

    pub fn from_env() -> Self {
        Self::new(NomadConfig::from_env())
    }
}

#[async_trait]
impl ClientFactory for StorageClientFactory {
    async fn client(
        &self,
        ctx: &RequestContext,
        storage: &dyn Storage,
    ) -> Result<Option<Arc<dyn AclTokenClient>>, LeaseError> {
        let access = match ctx.run(read_access_config(storage)).await? {
            Some(access) => Some(access),
            None => self.nomad.access_config()?,
        };
        let Some(access) = access else {
            debug!("No Nomad access configuration stored and NOMAD_ADDR not set");
            return Ok(None);
        };

        let client = NomadClient::new(&access, self.nomad.timeout())?;
        Ok(Some(Arc::new(client)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{write_access_config, AccessConfig};
    use crate::storage::InMemoryStorage;

    #[tokio::test]
    async fn test_no_configuration_yields_no_client() {
        let factory = StorageClientFactory::new(NomadConfig::default());
        let storage = InMemoryStorage::new();
        let client = factory
            .client(&RequestContext::default(), &storage)
            .await
            .unwrap();
        assert!(client.is_none());
    }

    #[tokio::test]
    async fn test_stored_configuration_builds_client() {
        let factory = StorageClientFactory::new(NomadConfig::default());
        let storage = InMemoryStorage::new();
        write_access_config(&storage, &AccessConfig::new("http://127.0.0.1:4646"))
            .await
            .unwrap();
        let client = factory
            .client(&RequestContext::default(), &storage)
            .await
            .unwrap();
        assert!(client.is_some());
    }

    #[tokio::test]
    async fn test_environment_fallback_builds_client() {
        let factory = StorageClientFactory::new(NomadConfig {
            address: Some("http://127.0.0.1:4646".to_string()),
            ..Default::default()
        });
        let storage = InMemoryStorage::new();
        let client = factory
            .client(&RequestContext::default(), &storage)
            .await
            .unwrap();
        assert!(client.is_some());
    }

    #[tokio::test]
    async fn test_invalid_address_is_propagated() {
        let factory = StorageClientFactory::new(NomadConfig::default());
        let storage = InMemoryStorage::new();
        write_access_config(&storage, &AccessConfig::new("not a url"))
            .await
            .unwrap();
        let result = factory.client(&RequestContext::default(), &storage).await;
        assert!(matches!(
            result,
            Err(LeaseError::Client(ClientError::Configuration(_)))
        ));
    }

    #[test]
    fn test_debug_hides_environment_token() {
        let factory = StorageClientFactory::new(NomadConfig {
            address: Some("http://127.0.0.1:4646".to_string()),
            token: Some(zeroize::Zeroizing::new("management-secret".to_string())),
            ..Default::default()
        });
        assert!(!format!("{factory:?}").contains("management-secret"));
    }
}
