//! Revocation flow tests against the mock Nomad ACL API

use super::server::{Behavior, MockNomad, RecordedRequest};
use nomad_secrets_lease::config::write_access_config;
use nomad_secrets_lease::{
    secret_token, AccessConfig, ClientError, FieldData, InMemoryStorage, LeaseError,
    NomadBackend, NomadConfig, Request, RequestContext, RevokeOutcome, Secret,
    StorageClientFactory, StoredLeasePolicy, TokenInternalData,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const MANAGEMENT_TOKEN: &str = "3c1f0a52-management";

fn backend() -> NomadBackend {
    NomadBackend::new(
        Arc::new(StoredLeasePolicy),
        Arc::new(StorageClientFactory::new(NomadConfig::default())),
    )
}

/// Storage with access configuration pointing at `address`
async fn configured_storage(address: &str) -> Arc<InMemoryStorage> {
    let storage = InMemoryStorage::new();
    write_access_config(
        &storage,
        &AccessConfig::new(address).with_token(MANAGEMENT_TOKEN),
    )
    .await
    .expect("Failed to store access configuration");
    Arc::new(storage)
}

async fn revoke_request(address: &str, accessor_id: &str) -> Request {
    let secret = Secret::new(TokenInternalData::new(accessor_id).into_internal_data());
    Request::new(secret, configured_storage(address).await)
}

async fn revoke_against(behavior: Behavior, accessor_id: &str) -> Result<RevokeOutcome, LeaseError> {
    let mock = MockNomad::new(behavior);
    let address = mock.start().await;
    let req = revoke_request(&address, accessor_id).await;
    backend().revoke(&RequestContext::new("test"), &req).await
}

#[tokio::test]
async fn test_revoke_deletes_existing_token() {
    let mock = MockNomad::new(Behavior::Nomad).with_tokens(&["abc123"]);
    let address = mock.start().await;
    let req = revoke_request(&address, "abc123").await;

    let outcome = backend()
        .revoke(&RequestContext::new("test"), &req)
        .await
        .expect("revocation should succeed");

    assert_eq!(outcome, RevokeOutcome::Revoked);
    assert!(!mock.has_token("abc123"));
    assert_eq!(
        mock.requests(),
        vec![RecordedRequest {
            accessor_id: "abc123".to_string(),
            token: Some(MANAGEMENT_TOKEN.to_string()),
        }]
    );
}

#[tokio::test]
async fn test_revoke_twice_is_idempotent() {
    let mock = MockNomad::new(Behavior::Nomad).with_tokens(&["abc123"]);
    let address = mock.start().await;
    let req = revoke_request(&address, "abc123").await;
    let ctx = RequestContext::new("test");

    let first = backend().revoke(&ctx, &req).await.unwrap();
    let second = backend().revoke(&ctx, &req).await.unwrap();

    assert_eq!(first, RevokeOutcome::Revoked);
    assert_eq!(second, RevokeOutcome::AlreadyRevoked);
    assert_eq!(mock.requests().len(), 2);
}

#[tokio::test]
async fn test_revoke_unknown_token_is_already_revoked() {
    let outcome = revoke_against(Behavior::Nomad, "abc123").await.unwrap();
    assert_eq!(outcome, RevokeOutcome::AlreadyRevoked);
}

#[tokio::test]
async fn test_revoke_body_for_other_accessor_fails() {
    let err = revoke_against(
        Behavior::Fixed(400, "Cannot delete nonexistent tokens: xyz999".to_string()),
        "abc123",
    )
    .await
    .unwrap_err();

    match err {
        LeaseError::Client(ClientError::UnexpectedResponse { status, body }) => {
            assert_eq!(status, 400);
            assert_eq!(body, "Cannot delete nonexistent tokens: xyz999");
        }
        other => panic!("Expected unexpected response error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_revoke_proxy_bad_request_fails() {
    let err = revoke_against(
        Behavior::Fixed(400, "no healthy upstream".to_string()),
        "abc123",
    )
    .await
    .unwrap_err();
    assert!(err.is_transient());
    assert_eq!(
        err.to_string(),
        "Unexpected response code: 400 (no healthy upstream)"
    );
}

#[tokio::test]
async fn test_revoke_matching_body_with_other_status_fails() {
    for status in [403, 404, 500, 503] {
        let err = revoke_against(
            Behavior::Fixed(status, "Cannot delete nonexistent tokens: abc123".to_string()),
            "abc123",
        )
        .await
        .unwrap_err();
        match err {
            LeaseError::Client(e) => assert_eq!(e.status_code(), Some(status)),
            other => panic!("Expected client error for status {status}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_revoke_non_ok_success_status_fails() {
    for status in [202, 204] {
        let err = revoke_against(Behavior::Fixed(status, String::new()), "abc123")
            .await
            .unwrap_err();
        match err {
            LeaseError::Client(ClientError::UnexpectedResponse { status: s, .. }) => {
                assert_eq!(s, status);
            }
            other => panic!("Expected unexpected response for status {status}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_revoke_truncated_body_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0_u8; 4096];
        let _ = socket.read(&mut buf).await;
        let _ = socket
            .write_all(b"HTTP/1.1 400 Bad Request\r\ncontent-length: 100\r\n\r\nCannot delete")
            .await;
        let _ = socket.shutdown().await;
    });

    let req = revoke_request(&address, "abc123").await;
    let err = backend()
        .revoke(&RequestContext::new("test"), &req)
        .await
        .unwrap_err();
    assert!(matches!(err, LeaseError::Client(ClientError::Transport(_))));
}

#[tokio::test]
async fn test_revoke_connection_refused_fails() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let req = revoke_request(&address, "abc123").await;
    let err = backend()
        .revoke(&RequestContext::new("test"), &req)
        .await
        .unwrap_err();
    assert!(matches!(err, LeaseError::Client(ClientError::Transport(_))));
}

#[tokio::test]
async fn test_revoke_cancellation_fails_promptly() {
    let mock = MockNomad::new(Behavior::Hang(Duration::from_secs(60)));
    let address = mock.start().await;
    let req = revoke_request(&address, "abc123").await;

    let ctx = RequestContext::new("test");
    let cancel = ctx.cancellation_token();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();
    });

    let start = Instant::now();
    let err = backend().revoke(&ctx, &req).await.unwrap_err();
    assert!(matches!(err, LeaseError::Cancelled));
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_revoke_without_access_configuration() {
    let secret = Secret::new(TokenInternalData::new("abc123").into_internal_data());
    let req = Request::new(secret, Arc::new(InMemoryStorage::new()));
    let err = backend()
        .revoke(&RequestContext::new("test"), &req)
        .await
        .unwrap_err();
    assert!(matches!(err, LeaseError::ClientUnavailable));
}

#[tokio::test]
async fn test_revoke_missing_accessor_sends_no_request() {
    let mock = MockNomad::new(Behavior::Nomad).with_tokens(&["abc123"]);
    let address = mock.start().await;
    let req = Request::new(Secret::default(), configured_storage(&address).await);

    let err = backend()
        .revoke(&RequestContext::new("test"), &req)
        .await
        .unwrap_err();
    assert!(matches!(err, LeaseError::MissingMetadata { .. }));
    assert!(mock.requests().is_empty());
    assert!(mock.has_token("abc123"));
}

#[tokio::test]
async fn test_on_revoke_callback() {
    let mock = MockNomad::new(Behavior::Nomad).with_tokens(&["abc123"]);
    let address = mock.start().await;
    let secret_type = secret_token(Arc::new(backend()));

    let resp = secret_type
        .on_revoke(
            &RequestContext::new("test"),
            revoke_request(&address, "abc123").await,
            &FieldData::default(),
        )
        .await
        .unwrap();
    assert!(resp.is_none());
    assert!(!mock.has_token("abc123"));
}
