//! # Nomad Connection Configuration
//!
//! Connection settings loaded from the same environment variables the Nomad
//! CLI understands.

use super::{env_var_opt, env_var_or_default, AccessConfig};
use crate::constants::DEFAULT_HTTP_TIMEOUT_SECS;
use crate::provider::nomad::ClientError;
use std::path::PathBuf;
use std::time::Duration;
use zeroize::Zeroizing;

/// Nomad connection configuration
#[derive(Clone, Default)]
pub struct NomadConfig {
    /// `NOMAD_ADDR`; when unset there is no environment fallback
    pub address: Option<String>,
    /// `NOMAD_TOKEN`
    pub token: Option<Zeroizing<String>>,
    /// `NOMAD_CACERT` (path to PEM file)
    pub ca_cert_path: Option<PathBuf>,
    /// `NOMAD_CLIENT_CERT` (path to PEM file)
    pub client_cert_path: Option<PathBuf>,
    /// `NOMAD_CLIENT_KEY` (path to PEM file)
    pub client_key_path: Option<PathBuf>,
    /// Per-request HTTP timeout; zero means the default
    pub http_timeout: Duration,
}

impl std::fmt::Debug for NomadConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NomadConfig")
            .field("address", &self.address)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("ca_cert_path", &self.ca_cert_path)
            .field("client_cert_path", &self.client_cert_path)
            .field("client_key_path", &self.client_key_path)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl NomadConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            address: env_var_opt("NOMAD_ADDR"),
            token: env_var_opt("NOMAD_TOKEN").map(Zeroizing::new),
            ca_cert_path: env_var_opt("NOMAD_CACERT").map(PathBuf::from),
            client_cert_path: env_var_opt("NOMAD_CLIENT_CERT").map(PathBuf::from),
            client_key_path: env_var_opt("NOMAD_CLIENT_KEY").map(PathBuf::from),
            http_timeout: Duration::from_secs(env_var_or_default(
                "NOMAD_HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )),
        }
    }

    pub fn timeout(&self) -> Duration {
        if self.http_timeout.is_zero() {
            Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)
        } else {
            self.http_timeout
        }
    }

    /// Access configuration derived from the environment, if `NOMAD_ADDR` is set.
    ///
    /// Certificate paths are read eagerly so a bad path surfaces as a
    /// configuration error rather than a TLS failure later.
    pub fn access_config(&self) -> Result<Option<AccessConfig>, ClientError> {
        let Some(address) = self.address.clone() else {
            return Ok(None);
        };
        Ok(Some(AccessConfig {
            address,
            token: self.token.as_ref().map(|token| token.as_str().to_owned()),
            ca_cert: read_pem(self.ca_cert_path.as_ref())?,
            client_cert: read_pem(self.client_cert_path.as_ref())?,
            client_key: read_pem(self.client_key_path.as_ref())?,
        }))
    }
}

fn read_pem(path: Option<&PathBuf>) -> Result<Option<String>, ClientError> {
    path.map(|p| {
        std::fs::read_to_string(p).map_err(|e| {
            ClientError::Configuration(format!("failed to read {}: {e}", p.display()))
        })
    })
    .transpose()
}
