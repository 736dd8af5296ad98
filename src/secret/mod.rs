//! # Secrets
//!
//! Leased secret types and the callbacks the host invokes on them.
//!
//! - `token`: Nomad ACL tokens (`SECRET_TOKEN_TYPE`)
//! - `metadata`: typed internal data persisted with each token lease
//!
//! The host owns the lease manager. It calls `SecretType::on_renew` when a
//! lease is extended and `SecretType::on_revoke` when it expires or is
//! revoked; renewal and revocation of one lease are never concurrent.

pub mod metadata;
pub mod token;

use crate::context::RequestContext;
use crate::error::LeaseError;
use crate::storage::Storage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

pub use metadata::TokenInternalData;
pub use token::{is_nonexistent_token_error, secret_token, NomadBackend};

/// Timing envelope attached to a secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseOptions {
    /// Zero defers to the host default TTL
    #[serde(default, with = "humantime_serde")]
    pub ttl: Duration,
    /// Zero defers to the host default max TTL
    #[serde(default, with = "humantime_serde")]
    pub max_ttl: Duration,
    #[serde(default = "default_renewable")]
    pub renewable: bool,
}

fn default_renewable() -> bool {
    true
}

impl Default for LeaseOptions {
    fn default() -> Self {
        Self {
            ttl: Duration::ZERO,
            max_ttl: Duration::ZERO,
            renewable: true,
        }
    }
}

/// A leased credential as tracked by the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Secret {
    /// Private to this backend, never returned to the secret holder
    #[serde(default)]
    pub internal_data: Map<String, Value>,
    #[serde(default)]
    pub lease: LeaseOptions,
}

impl Secret {
    pub fn new(internal_data: Map<String, Value>) -> Self {
        Self {
            internal_data,
            lease: LeaseOptions::default(),
        }
    }
}

/// A renew or revoke request from the host
#[derive(Clone)]
pub struct Request {
    pub secret: Secret,
    pub storage: Arc<dyn Storage>,
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("secret", &self.secret)
            .finish_non_exhaustive()
    }
}

impl Request {
    pub fn new(secret: Secret, storage: Arc<dyn Storage>) -> Self {
        Self { secret, storage }
    }
}

/// Handler response returned to the host
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub secret: Option<Secret>,
}

/// Result of a successful revocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokeOutcome {
    /// The credential was deleted upstream
    Revoked,
    /// Upstream reported the credential as already gone
    AlreadyRevoked,
}

impl RevokeOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            RevokeOutcome::Revoked => "revoked",
            RevokeOutcome::AlreadyRevoked => "already_revoked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
}

/// Externally visible field of a secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    pub field_type: FieldType,
    pub description: &'static str,
}

/// Raw request fields supplied by the host
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldData {
    pub raw: Map<String, Value>,
}

/// Lifecycle callbacks for one secret type
#[async_trait]
pub trait SecretHandler: Send + Sync {
    async fn renew(&self, ctx: &RequestContext, req: Request) -> Result<Response, LeaseError>;

    async fn revoke(&self, ctx: &RequestContext, req: &Request)
        -> Result<RevokeOutcome, LeaseError>;
}

/// Secret type descriptor registered with the host
#[derive(Clone)]
pub struct SecretType {
    pub type_name: &'static str,
    pub fields: BTreeMap<&'static str, FieldSchema>,
    handler: Arc<dyn SecretHandler>,
}

impl std::fmt::Debug for SecretType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretType")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl SecretType {
    pub fn new(
        type_name: &'static str,
        fields: BTreeMap<&'static str, FieldSchema>,
        handler: Arc<dyn SecretHandler>,
    ) -> Self {
        Self {
            type_name,
            fields,
            handler,
        }
    }

    /// Renew callback; the response carries the renewed secret
    pub async fn on_renew(
        &self,
        ctx: &RequestContext,
        req: Request,
        _data: &FieldData,
    ) -> Result<Response, LeaseError> {
        self.handler.renew(ctx, req).await
    }

    /// Revoke callback; success carries no response body
    pub async fn on_revoke(
        &self,
        ctx: &RequestContext,
        req: Request,
        _data: &FieldData,
    ) -> Result<Option<Response>, LeaseError> {
        self.handler.revoke(ctx, &req).await?;
        Ok(None)
    }
}
