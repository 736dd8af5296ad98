//! # Nomad ACL Client
//!
//! Client for the Nomad ACL token API.
//!
//! Native REST implementation using reqwest with rustls. Only the calls the
//! lease handlers need are implemented.

mod error;

pub use error::ClientError;

use super::AclTokenClient;
use crate::config::AccessConfig;
use crate::observability::metrics;
use async_trait::async_trait;
use paths::nomad::{AclOperation, TOKEN_HEADER};
use reqwest::{Certificate, Identity, StatusCode, Url};
use std::time::{Duration, Instant};
use tracing::{debug, debug_span, Instrument};
use zeroize::Zeroizing;

/// Nomad ACL API client
pub struct NomadClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<Zeroizing<String>>,
}

impl std::fmt::Debug for NomadClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NomadClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl NomadClient {
    /// Create a client from access configuration
    ///
    /// # Errors
    /// Returns `ClientError::Configuration` if the address or TLS material is invalid
    pub fn new(access: &AccessConfig, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(access.address.trim()).map_err(|e| {
            ClientError::Configuration(format!("invalid address {}: {e}", access.address))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Configuration(format!(
                "address {} cannot be used as a base URL",
                access.address
            )));
        }

        let mut builder = reqwest::Client::builder().timeout(timeout);

        if let Some(ca_cert) = &access.ca_cert {
            let cert = Certificate::from_pem(ca_cert.as_bytes())
                .map_err(|e| ClientError::Configuration(format!("invalid ca_cert: {e}")))?;
            builder = builder.add_root_certificate(cert);
        }

        if let (Some(cert), Some(key)) = (&access.client_cert, &access.client_key) {
            let pem = Zeroizing::new(format!("{cert}\n{key}"));
            let identity = Identity::from_pem(pem.as_bytes()).map_err(|e| {
                ClientError::Configuration(format!("invalid client certificate: {e}"))
            })?;
            builder = builder.identity(identity);
        }

        let http = builder
            .build()
            .map_err(|e| ClientError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            token: access.token.clone().map(Zeroizing::new),
        })
    }

    fn operation_url(&self, operation: AclOperation, accessor_id: &str) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(operation.segments())
                .push(accessor_id);
        }
        url
    }
}

#[async_trait]
impl AclTokenClient for NomadClient {
    async fn delete_token(&self, accessor_id: &str) -> Result<(), ClientError> {
        let operation = AclOperation::DeleteToken;
        let url = self.operation_url(operation, accessor_id);
        let span = debug_span!(
            "nomad.acl.token.delete",
            http.method = operation.method(),
            http.url = %url,
            http.status_code = tracing::field::Empty,
        );
        let span_clone = span.clone();
        let start = Instant::now();

        async move {
            let mut request = self.http.delete(url);
            if let Some(token) = &self.token {
                request = request.header(TOKEN_HEADER, token.as_str());
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => {
                    metrics::observe_nomad_request("delete_token", "error", start.elapsed());
                    return Err(ClientError::Transport(e));
                }
            };

            let status = response.status();
            span_clone.record("http.status_code", status.as_u16());
            metrics::observe_nomad_request("delete_token", status.as_str(), start.elapsed());

            // Nomad answers a delete with 200; anything else did not come from it
            if status == StatusCode::OK {
                debug!("Deleted Nomad ACL token {}", accessor_id);
                return Ok(());
            }

            let body = response.text().await.map_err(ClientError::Transport)?;
            Err(ClientError::UnexpectedResponse {
                status: status.as_u16(),
                body: body.trim().to_string(),
            })
        }
        .instrument(span)
        .await
    }
}
