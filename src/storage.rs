//! # Storage
//!
//! Host-provided storage used to read lease policy and Nomad access
//! configuration. The host owns the real backend; `InMemoryStorage` backs the
//! CLI and tests.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Storage failure
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying storage I/O failed
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("failed to encode storage entry {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode storage entry {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A single key/value record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEntry {
    pub key: String,
    pub value: Vec<u8>,
}

impl StorageEntry {
    /// Build an entry holding `value` encoded as JSON
    pub fn json<T: Serialize>(key: impl Into<String>, value: &T) -> Result<Self, StorageError> {
        let key = key.into();
        match serde_json::to_vec(value) {
            Ok(value) => Ok(Self { key, value }),
            Err(source) => Err(StorageError::Encode { key, source }),
        }
    }

    /// Decode the entry value from JSON
    pub fn decode_json<T: DeserializeOwned>(&self) -> Result<T, StorageError> {
        serde_json::from_slice(&self.value).map_err(|source| StorageError::Decode {
            key: self.key.clone(),
            source,
        })
    }
}

/// Key/value storage scoped to this backend's mount
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<StorageEntry>, StorageError>;

    async fn put(&self, entry: StorageEntry) -> Result<(), StorageError>;

    /// Deleting a missing key is not an error
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Keys starting with `prefix`, in lexical order
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}

/// In-memory storage; clones share the same map
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    entries: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<StorageEntry>, StorageError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).map(|value| StorageEntry {
            key: key.to_string(),
            value: value.clone(),
        }))
    }

    async fn put(&self, entry: StorageEntry) -> Result<(), StorageError> {
        self.entries.write().await.insert(entry.key, entry.value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let entries = self.entries.read().await;
        Ok(entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}
