//! # Nomad Token Secret
//!
//! Renewal and revocation of dynamically issued Nomad ACL tokens.
//!
//! Renewal re-applies the configured lease policy. Revocation deletes the
//! token by accessor ID. Nomad answers 400 for several unrelated failures
//! (a proxy with no healthy backend, for instance), so a delete is only
//! treated as already done when both the status and the exact body match.

use super::metadata;
use super::{
    FieldSchema, FieldType, Request, Response, RevokeOutcome, SecretHandler, SecretType,
};
use crate::config::{LeasePolicyStore, StoredLeasePolicy};
use crate::constants::{NONEXISTENT_TOKENS_PREFIX, SECRET_TOKEN_TYPE};
use crate::context::RequestContext;
use crate::error::LeaseError;
use crate::observability::metrics;
use crate::provider::{ClientError, ClientFactory, StorageClientFactory};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{field, info, info_span, warn, Instrument};

/// Nomad secrets backend: lease policy plus client factory
#[derive(Clone)]
pub struct NomadBackend {
    policy: Arc<dyn LeasePolicyStore>,
    clients: Arc<dyn ClientFactory>,
}

impl std::fmt::Debug for NomadBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NomadBackend").finish_non_exhaustive()
    }
}

impl NomadBackend {
    pub fn new(policy: Arc<dyn LeasePolicyStore>, clients: Arc<dyn ClientFactory>) -> Self {
        Self { policy, clients }
    }

    /// Backend reading policy and access configuration from storage, with
    /// the `NOMAD_*` environment as connection fallback
    pub fn from_env() -> Self {
        Self::new(
            Arc::new(StoredLeasePolicy),
            Arc::new(StorageClientFactory::from_env()),
        )
    }

    /// Refresh the secret's TTL and max TTL from the lease policy.
    ///
    /// No policy configured means zero values, deferring to the host
    /// defaults. Only a policy lookup failure is an error.
    pub async fn renew(&self, ctx: &RequestContext, req: Request) -> Result<Response, LeaseError> {
        let span = info_span!(
            "nomad.token.renew",
            request.id = %ctx.request_id,
            lease.ttl = field::Empty,
            lease.max_ttl = field::Empty,
        );
        let span_clone = span.clone();

        async move {
            let lease = match self.policy.lease_config(ctx, req.storage.as_ref()).await {
                Ok(lease) => lease.unwrap_or_default(),
                Err(e) => {
                    metrics::increment_lease_errors("renew", e.as_str());
                    warn!("Failed to read lease configuration: {}", e);
                    return Err(e);
                }
            };

            let Request { mut secret, .. } = req;
            secret.lease.ttl = lease.ttl;
            secret.lease.max_ttl = lease.max_ttl;

            span_clone.record("lease.ttl", lease.ttl.as_secs());
            span_clone.record("lease.max_ttl", lease.max_ttl.as_secs());
            metrics::increment_lease_renewals();

            Ok(Response {
                secret: Some(secret),
            })
        }
        .instrument(span)
        .await
    }

    /// Delete the token behind the secret from Nomad.
    ///
    /// `AcquireClient -> ExtractAccessor -> Delete`. Nothing is retried here;
    /// failures go back to the host's revocation scheduler.
    pub async fn revoke(
        &self,
        ctx: &RequestContext,
        req: &Request,
    ) -> Result<RevokeOutcome, LeaseError> {
        let span = info_span!(
            "nomad.token.revoke",
            request.id = %ctx.request_id,
            accessor.id = field::Empty,
            operation.outcome = field::Empty,
            operation.duration_ms = field::Empty,
        );
        let span_clone = span.clone();
        let start = Instant::now();

        async move {
            let result = self.delete_token(ctx, req, &span_clone).await;

            #[allow(
                clippy::cast_possible_truncation,
                reason = "Revocation never runs anywhere near u64::MAX milliseconds"
            )]
            let elapsed_ms = start.elapsed().as_millis() as u64;
            span_clone.record("operation.duration_ms", elapsed_ms);

            match &result {
                Ok(outcome) => {
                    span_clone.record("operation.outcome", outcome.as_str());
                    metrics::increment_lease_revocations(outcome.as_str());
                }
                Err(e) => {
                    span_clone.record("operation.outcome", "failed");
                    metrics::increment_lease_revocations("failed");
                    metrics::increment_lease_errors("revoke", e.as_str());
                    warn!(
                        transient = e.is_transient(),
                        "Failed to revoke Nomad token: {}", e
                    );
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn delete_token(
        &self,
        ctx: &RequestContext,
        req: &Request,
        span: &tracing::Span,
    ) -> Result<RevokeOutcome, LeaseError> {
        let client = self
            .clients
            .client(ctx, req.storage.as_ref())
            .await?
            .ok_or(LeaseError::ClientUnavailable)?;

        let accessor_id = metadata::accessor_id(&req.secret.internal_data)?;
        span.record("accessor.id", accessor_id);

        match ctx.run(client.delete_token(accessor_id)).await {
            Ok(()) => {
                info!("Revoked Nomad token {}", accessor_id);
                Ok(RevokeOutcome::Revoked)
            }
            Err(LeaseError::Client(e)) if is_nonexistent_token_error(&e, accessor_id) => {
                info!("Nomad token {} was already deleted", accessor_id);
                Ok(RevokeOutcome::AlreadyRevoked)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl SecretHandler for NomadBackend {
    async fn renew(&self, ctx: &RequestContext, req: Request) -> Result<Response, LeaseError> {
        NomadBackend::renew(self, ctx, req).await
    }

    async fn revoke(
        &self,
        ctx: &RequestContext,
        req: &Request,
    ) -> Result<RevokeOutcome, LeaseError> {
        NomadBackend::revoke(self, ctx, req).await
    }
}

/// True only for Nomad's "already deleted" answer for this exact accessor:
/// status 400 and body equal to `Cannot delete nonexistent tokens: <accessor_id>`.
///
/// This may stop matching if Nomad rewords the message; the delete is then
/// reported as failed.
pub fn is_nonexistent_token_error(err: &ClientError, accessor_id: &str) -> bool {
    err.status_code() == Some(400)
        && err
            .body()
            .and_then(|body| body.strip_prefix(NONEXISTENT_TOKENS_PREFIX))
            .is_some_and(|rest| rest == accessor_id)
}

/// Descriptor for the `token` secret type
pub fn secret_token(backend: Arc<NomadBackend>) -> SecretType {
    let mut fields = BTreeMap::new();
    fields.insert(
        "token",
        FieldSchema {
            field_type: FieldType::String,
            description: "Request token",
        },
    );
    SecretType::new(SECRET_TOKEN_TYPE, fields, backend)
}
