//! # Request Context
//!
//! Per-invocation context handed in by the host. Carries the cancellation
//! token that bounds every external call made on behalf of the request.

use crate::error::LeaseError;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Context for a single renew or revoke invocation
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Correlation ID recorded on tracing spans
    pub request_id: String,
    cancel: CancellationToken,
}

impl RequestContext {
    /// Create a context with a fresh, uncancelled token
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            cancel: CancellationToken::new(),
        }
    }

    /// Create a context driven by a token owned by the host
    pub fn with_cancellation(request_id: impl Into<String>, cancel: CancellationToken) -> Self {
        Self {
            request_id: request_id.into(),
            cancel,
        }
    }

    /// Token the host can use to cancel this request
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Race `fut` against cancellation of this context.
    ///
    /// Returns `LeaseError::Cancelled` as soon as the token fires; the inner
    /// future is dropped at that point.
    pub async fn run<F, T, E>(&self, fut: F) -> Result<T, LeaseError>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<LeaseError>,
    {
        if self.is_cancelled() {
            return Err(LeaseError::Cancelled);
        }
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(LeaseError::Cancelled),
            result = fut => result.map_err(Into::into),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new("")
    }
}
