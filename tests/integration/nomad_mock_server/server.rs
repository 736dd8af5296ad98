//! Mock Nomad ACL Server
//!
//! A lightweight Axum-based HTTP server mimicking `DELETE /v1/acl/token/:accessor_id`.
//! Known tokens are deleted with 200; unknown ones get Nomad's 400 answer,
//! including the trailing newline Nomad's HTTP layer appends.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::delete,
    Router,
};
use paths::nomad::{ACL_TOKEN_ROUTE, TOKEN_HEADER};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How the mock answers delete requests
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Behave like Nomad: delete known tokens, reject unknown ones
    Nomad,
    /// Always answer with this status and body
    Fixed(u16, String),
    /// Never answer within the test's lifetime
    Hang(Duration),
}

/// A recorded delete request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub accessor_id: String,
    pub token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MockNomad {
    behavior: Behavior,
    tokens: Arc<Mutex<HashSet<String>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockNomad {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            tokens: Arc::new(Mutex::new(HashSet::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_tokens(self, accessors: &[&str]) -> Self {
        self.tokens
            .lock()
            .unwrap()
            .extend(accessors.iter().map(|a| (*a).to_string()));
        self
    }

    pub fn has_token(&self, accessor_id: &str) -> bool {
        self.tokens.lock().unwrap().contains(accessor_id)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Serve on an ephemeral localhost port; returns the base address
    pub async fn start(&self) -> String {
        let app = Router::new()
            .route(ACL_TOKEN_ROUTE, delete(delete_token))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock Nomad listener");
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock Nomad server failed");
        });
        format!("http://{addr}")
    }
}

async fn delete_token(
    State(state): State<MockNomad>,
    Path(accessor_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.requests.lock().unwrap().push(RecordedRequest {
        accessor_id: accessor_id.clone(),
        token: headers
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    match &state.behavior {
        Behavior::Nomad => {
            let removed = state.tokens.lock().unwrap().remove(&accessor_id);
            if removed {
                (StatusCode::OK, "").into_response()
            } else {
                (
                    StatusCode::BAD_REQUEST,
                    format!("Cannot delete nonexistent tokens: {accessor_id}\n"),
                )
                    .into_response()
            }
        }
        Behavior::Fixed(status, body) => (
            StatusCode::from_u16(*status).unwrap(),
            body.clone(),
        )
            .into_response(),
        Behavior::Hang(duration) => {
            tokio::time::sleep(*duration).await;
            StatusCode::OK.into_response()
        }
    }
}
