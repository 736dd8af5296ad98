//! # Nomad Secrets Lease
//!
//! Lease lifecycle handlers for dynamically issued Nomad ACL tokens.
//!
//! ## Overview
//!
//! A secrets host issues Nomad ACL tokens as leased secrets and calls back
//! into this crate when a lease is renewed or revoked:
//!
//! 1. **Renewal** - Re-reads the lease policy (`config/lease`) and applies its
//!    TTL and max TTL to the secret. No policy means host defaults.
//! 2. **Revocation** - Deletes the token from Nomad by accessor ID. Nomad's
//!    "Cannot delete nonexistent tokens" answer for that accessor counts as
//!    success; every other failure is returned to the host for retry.
//!
//! Both handlers take their collaborators explicitly: a `LeasePolicyStore`
//! and a `ClientFactory`, each reading from the host-provided `Storage`.

pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod observability;
pub mod provider;
pub mod secret;
pub mod storage;

pub use config::{AccessConfig, LeaseConfig, LeasePolicyStore, NomadConfig, StoredLeasePolicy};
pub use context::RequestContext;
pub use error::LeaseError;
pub use provider::{AclTokenClient, ClientError, ClientFactory, NomadClient, StorageClientFactory};
pub use secret::{
    secret_token, FieldData, NomadBackend, Request, Response, RevokeOutcome, Secret, SecretType,
    TokenInternalData,
};
pub use storage::{InMemoryStorage, Storage, StorageEntry, StorageError};
