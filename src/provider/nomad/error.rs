//! # Nomad Client Errors

use thiserror::Error;

/// Error returned by the Nomad ACL client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Nomad answered with a non-success status.
    /// `body` is the response text with surrounding whitespace trimmed.
    #[error("Unexpected response code: {status} ({body})")]
    UnexpectedResponse { status: u16, body: String },

    /// Request never produced a response (connect, TLS, timeout)
    #[error("Nomad request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Address or TLS material could not be used to build a client
    #[error("invalid Nomad client configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::UnexpectedResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            ClientError::UnexpectedResponse { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Configuration errors need operator action; everything else may
    /// succeed on a later attempt.
    pub fn is_transient(&self) -> bool {
        !matches!(self, ClientError::Configuration(_))
    }
}
