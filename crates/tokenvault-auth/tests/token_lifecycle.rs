//! Integration tests for the refresh token lifecycle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use tokenvault_auth::jwt::Clock;
use tokenvault_auth::{
    MemoryRefreshTokenStore, RefreshTokenStore, RevocationStore, SigningSecret, TokenLifecycle,
    Tokenizer,
};
use tokenvault_core::error::{AppError, ErrorKind};
use tokenvault_core::result::AppResult;
use tokenvault_entity::token::{NewRefreshToken, RefreshTokenRecord};

fn tokenizer() -> Tokenizer {
    Tokenizer::new(
        SigningSecret::new("integration-access-secret-0123456789").unwrap(),
        SigningSecret::new("integration-refresh-secret-0123456789").unwrap(),
    )
    .unwrap()
}

fn lifecycle_with(tokenizer: Tokenizer) -> (TokenLifecycle, MemoryRefreshTokenStore) {
    let backend = MemoryRefreshTokenStore::new();
    let store = RevocationStore::new(Arc::new(backend.clone()));
    (TokenLifecycle::new(Arc::new(tokenizer), store), backend)
}

fn fixed_clock(at: DateTime<Utc>) -> Clock {
    Arc::new(move || at)
}

#[tokio::test]
async fn test_refresh_token_revocation_end_to_end() {
    let tokenizer = tokenizer();
    let store = RevocationStore::new(Arc::new(MemoryRefreshTokenStore::new()));

    let refresh = tokenizer
        .create_refresh_token(42, "a@b.com", ["USER"])
        .unwrap();
    let claims = tokenizer.parse_refresh_token(refresh.as_str()).unwrap();

    store
        .add(NewRefreshToken {
            user_id: claims.user_id,
            value: refresh.as_str().to_string(),
            expires_at: claims.expires_at,
        })
        .await
        .unwrap();

    let record = store.find(refresh.as_str()).await.unwrap().unwrap();
    assert_eq!(record.value, refresh.as_str());
    assert_eq!(record.user_id, 42);

    store.delete(refresh.as_str()).await.unwrap();
    assert!(store.find(refresh.as_str()).await.unwrap().is_none());

    let lifecycle = TokenLifecycle::new(Arc::new(tokenizer), store);
    let err = lifecycle.rotate(refresh.as_str()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::TokenRevoked);
}

#[tokio::test]
async fn test_issue_persists_refresh_token() {
    let (lifecycle, backend) = lifecycle_with(tokenizer());

    let pair = lifecycle.issue(42, "a@b.com", ["USER"]).await.unwrap();

    let record = lifecycle
        .store()
        .find(pair.refresh_token.as_str())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.user_id, 42);
    assert_eq!(record.expires_at, pair.refresh_expires_at);
    assert_eq!(backend.len(), 1);

    let claims = lifecycle
        .authenticate(&format!("Bearer {}", pair.access_token.as_str()))
        .unwrap();
    assert_eq!(claims.user_id, 42);
    assert_eq!(claims.roles, vec!["USER".to_string()]);
}

#[tokio::test]
async fn test_rotate_replaces_stored_token() {
    let (lifecycle, backend) = lifecycle_with(tokenizer());
    let first = lifecycle.issue(42, "a@b.com", ["USER", "ADMIN"]).await.unwrap();

    let second = lifecycle.rotate(first.refresh_token.as_str()).await.unwrap();

    assert_ne!(first.refresh_token, second.refresh_token);
    assert!(
        lifecycle
            .store()
            .find(first.refresh_token.as_str())
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(backend.len(), 1);

    let claims = lifecycle
        .tokenizer()
        .parse_refresh_token(second.refresh_token.as_str())
        .unwrap();
    assert_eq!(claims.subject, "a@b.com");
    assert_eq!(claims.roles, vec!["USER".to_string(), "ADMIN".to_string()]);

    let err = lifecycle
        .rotate(first.refresh_token.as_str())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::TokenRevoked);
}

#[tokio::test]
async fn test_concurrent_rotation_yields_one_pair() {
    let (lifecycle, _) = lifecycle_with(tokenizer());
    let pair = lifecycle.issue(7, "c@d.com", ["USER"]).await.unwrap();
    let token = pair.refresh_token.as_str();

    let (a, b) = tokio::join!(lifecycle.rotate(token), lifecycle.rotate(token));

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        outcomes
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| e.kind == ErrorKind::TokenRevoked)
    );
}

#[tokio::test]
async fn test_rotate_rejects_access_token() {
    let (lifecycle, _) = lifecycle_with(tokenizer());
    let pair = lifecycle.issue(42, "a@b.com", ["USER"]).await.unwrap();

    let err = lifecycle
        .rotate(pair.access_token.as_str())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::TokenInvalid);
}

#[tokio::test]
async fn test_rotate_expired_refresh_token() {
    let issued = DateTime::from_timestamp(1_760_000_000, 0).unwrap();
    let (issuer, backend) = lifecycle_with(tokenizer().with_clock(fixed_clock(issued)));
    let pair = issuer.issue(42, "a@b.com", ["USER"]).await.unwrap();

    let later = tokenizer().with_clock(fixed_clock(issued + Duration::days(7)));
    let lifecycle = TokenLifecycle::new(
        Arc::new(later),
        RevocationStore::new(Arc::new(backend.clone())),
    );

    let err = lifecycle
        .rotate(pair.refresh_token.as_str())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::TokenExpired);

    let purged = lifecycle
        .store()
        .purge_expired(issued + Duration::days(7))
        .await
        .unwrap();
    assert_eq!(purged, 1);
    assert!(backend.is_empty());
}

#[tokio::test]
async fn test_revoke_all_for_user() {
    let (lifecycle, backend) = lifecycle_with(tokenizer());
    let a = lifecycle.issue(1, "a@b.com", ["USER"]).await.unwrap();
    lifecycle.issue(1, "a@b.com", ["USER"]).await.unwrap();
    let other = lifecycle.issue(2, "c@d.com", ["USER"]).await.unwrap();

    assert_eq!(lifecycle.revoke_all(1).await.unwrap(), 2);
    assert_eq!(backend.len(), 1);

    assert!(!lifecycle.revoke(a.refresh_token.as_str()).await.unwrap());
    assert!(lifecycle.revoke(other.refresh_token.as_str()).await.unwrap());
    assert!(backend.is_empty());
}

#[tokio::test]
async fn test_authenticate_malformed_header() {
    let (lifecycle, _) = lifecycle_with(tokenizer());

    let err = lifecycle.authenticate("no-space-here").unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedHeader);
}

/// Memory store whose inserts fail once `fail_inserts` is set.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryRefreshTokenStore,
    fail_inserts: AtomicBool,
}

#[async_trait]
impl RefreshTokenStore for FlakyStore {
    async fn insert(&self, data: &NewRefreshToken) -> AppResult<RefreshTokenRecord> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::store_unavailable("connection reset"));
        }
        self.inner.insert(data).await
    }

    async fn find_by_value(&self, value: &str) -> AppResult<Option<RefreshTokenRecord>> {
        self.inner.find_by_value(value).await
    }

    async fn delete_by_value(&self, value: &str) -> AppResult<bool> {
        self.inner.delete_by_value(value).await
    }

    async fn delete_by_user(&self, user_id: i64) -> AppResult<u64> {
        self.inner.delete_by_user(user_id).await
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        self.inner.delete_expired(now).await
    }
}

#[tokio::test]
async fn test_rotate_store_failure_leaves_no_refresh_token() {
    let backend = Arc::new(FlakyStore::default());
    let lifecycle = TokenLifecycle::new(
        Arc::new(tokenizer()),
        RevocationStore::new(backend.clone()),
    );
    let pair = lifecycle.issue(42, "a@b.com", ["USER"]).await.unwrap();

    backend.fail_inserts.store(true, Ordering::SeqCst);
    let err = lifecycle
        .rotate(pair.refresh_token.as_str())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::StoreUnavailable);
    assert!(backend.inner.is_empty());

    backend.fail_inserts.store(false, Ordering::SeqCst);
    let err = lifecycle
        .rotate(pair.refresh_token.as_str())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::TokenRevoked);
}
