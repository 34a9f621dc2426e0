//! Unit tests for token service

use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use super::{admin, clock, principal, token_service};
use crate::domain::entities::principal::{EntityType, PrincipalSummary};
use crate::domain::entities::token::{RefreshToken, TOKEN_TYPE_BEARER};
use crate::errors::{DomainError, TokenError};
use crate::repositories::{MockRefreshTokenRepository, RefreshTokenRepository};
use crate::services::clock::Clock;
use crate::services::token::hash_secret;

/// Resolver that hands back a fixed identity
fn same_principal(
    summary: PrincipalSummary,
) -> impl FnOnce(RefreshToken) -> std::future::Ready<Result<PrincipalSummary, DomainError>> + Send {
    move |_| std::future::ready(Ok(summary))
}

#[tokio::test]
async fn test_issue_refresh_token_stores_only_digest() {
    let repo = MockRefreshTokenRepository::new();
    let clock = clock();
    let service = token_service(&repo, &clock);
    let subject = Uuid::new_v4();

    let secret = service
        .issue_refresh_token(subject, EntityType::User, Some("10.0.0.1".into()), Some("ua".into()))
        .await
        .unwrap();

    assert!(repo.find_by_hash(&secret).await.unwrap().is_none());
    let stored = repo.find_by_hash(&hash_secret(&secret)).await.unwrap().unwrap();
    assert_eq!(stored.subject_id, subject);
    assert_eq!(stored.ip_address.as_deref(), Some("10.0.0.1"));
    assert_eq!(stored.expires_at, clock.now() + Duration::days(7));
    assert!(!stored.is_revoked);
}

#[tokio::test]
async fn test_redeem_refresh_token() {
    let repo = MockRefreshTokenRepository::new();
    let clock = clock();
    let service = token_service(&repo, &clock);

    let secret = service
        .issue_refresh_token(Uuid::new_v4(), EntityType::Ngo, None, None)
        .await
        .unwrap();
    let token = service.redeem_refresh_token(&secret).await.unwrap();
    assert_eq!(token.entity_type, EntityType::Ngo);

    let missing = service.redeem_refresh_token("unknown").await;
    assert!(matches!(missing, Err(DomainError::Token(TokenError::NotFound))));

    service.revoke(&secret, "logout").await.unwrap();
    let revoked = service.redeem_refresh_token(&secret).await;
    assert!(matches!(revoked, Err(DomainError::Token(TokenError::Inactive))));
}

#[tokio::test]
async fn test_expired_refresh_token_is_never_redeemed() {
    let repo = MockRefreshTokenRepository::new();
    let clock = clock();
    let service = token_service(&repo, &clock);
    let user = principal(EntityType::User);

    let secret = service
        .issue_refresh_token(user.id, EntityType::User, None, None)
        .await
        .unwrap();
    clock.advance(Duration::days(7));

    let result = service.redeem_refresh_token(&secret).await;
    assert!(matches!(result, Err(DomainError::Token(TokenError::Inactive))));

    let result = service.rotate(&secret, None, None, same_principal(user)).await;
    assert!(matches!(result, Err(DomainError::Token(TokenError::Inactive))));
}

#[tokio::test]
async fn test_rotate_issues_new_pair_and_spends_old_token() {
    let repo = MockRefreshTokenRepository::new();
    let clock = clock();
    let service = token_service(&repo, &clock);
    let user = principal(EntityType::User);

    let first = service
        .issue_refresh_token(user.id, EntityType::User, None, None)
        .await
        .unwrap();
    let pair = service
        .rotate(&first, None, None, same_principal(user.clone()))
        .await
        .unwrap();

    assert_eq!(pair.token_type, TOKEN_TYPE_BEARER);
    assert_eq!(pair.expires_in, "15m");
    assert_ne!(pair.refresh_token, first);

    let claims = service.verify_access_token(&pair.access_token).await.unwrap();
    assert_eq!(claims.subject_id().unwrap(), user.id);

    let old = repo.find_by_hash(&hash_secret(&first)).await.unwrap().unwrap();
    assert!(old.is_revoked);
    assert_eq!(old.revoked_reason.as_deref(), Some("rotation"));

    let again = service.rotate(&first, None, None, same_principal(user.clone())).await;
    assert!(matches!(again, Err(DomainError::Token(TokenError::Inactive))));

    // The successor is usable
    service
        .rotate(&pair.refresh_token, None, None, same_principal(user))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_rotate_unknown_secret_is_not_found() {
    let repo = MockRefreshTokenRepository::new();
    let clock = clock();
    let service = token_service(&repo, &clock);

    let result = service
        .rotate("nope", None, None, same_principal(principal(EntityType::User)))
        .await;
    assert!(matches!(result, Err(DomainError::Token(TokenError::NotFound))));
}

#[tokio::test]
async fn test_rotate_stops_when_resolver_refuses() {
    let repo = MockRefreshTokenRepository::new();
    let clock = clock();
    let service = token_service(&repo, &clock);
    let subject = Uuid::new_v4();

    let secret = service
        .issue_refresh_token(subject, EntityType::User, None, None)
        .await
        .unwrap();
    let result = service
        .rotate(&secret, None, None, |_| async { Err(DomainError::unauthorized("disabled")) })
        .await;

    assert!(matches!(result, Err(DomainError::Unauthorized { .. })));
    assert_eq!(repo.tokens_for(subject).await.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_rotation_succeeds_exactly_once() {
    let repo = MockRefreshTokenRepository::new();
    let clock = clock();
    let service = Arc::new(token_service(&repo, &clock));
    let user = principal(EntityType::User);

    let secret = service
        .issue_refresh_token(user.id, EntityType::User, None, None)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        let secret = secret.clone();
        let user = user.clone();
        handles.push(tokio::spawn(async move {
            service
                .rotate(&secret, None, None, move |_| async move { Ok(user) })
                .await
        }));
    }

    let mut successes = 0;
    let mut inactive = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(DomainError::Token(TokenError::Inactive)) => inactive += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(inactive, 7);
    // The original plus exactly one successor
    assert_eq!(repo.tokens_for(user.id).await.len(), 2);
}

#[tokio::test]
async fn test_revoke_all_counts_transitions() {
    let repo = MockRefreshTokenRepository::new();
    let clock = clock();
    let service = token_service(&repo, &clock);
    let subject = Uuid::new_v4();

    let a = service.issue_refresh_token(subject, EntityType::User, None, None).await.unwrap();
    let b = service.issue_refresh_token(subject, EntityType::User, None, None).await.unwrap();
    service.issue_refresh_token(subject, EntityType::User, None, None).await.unwrap();
    service.revoke(&a, "logout").await.unwrap();

    let count = service.revoke_all(subject, EntityType::User, "banned").await.unwrap();
    assert_eq!(count, 2);
    assert!(service.redeem_refresh_token(&b).await.is_err());
    assert_eq!(service.revoke_all(subject, EntityType::User, "banned").await.unwrap(), 0);
}

#[tokio::test]
async fn test_revoke_reports_existence() {
    let repo = MockRefreshTokenRepository::new();
    let clock = clock();
    let service = token_service(&repo, &clock);

    let secret = service
        .issue_refresh_token(Uuid::new_v4(), EntityType::User, None, None)
        .await
        .unwrap();
    assert!(service.revoke(&secret, "logout").await.unwrap());
    assert!(service.revoke(&secret, "logout").await.unwrap());
    assert!(!service.revoke("missing", "logout").await.unwrap());
}

#[tokio::test]
async fn test_revoke_access_token() {
    let repo = MockRefreshTokenRepository::new();
    let clock = clock();
    let service = token_service(&repo, &clock);

    let token = service.issue_access_token(&admin()).unwrap();
    assert!(service.verify_access_token(&token).await.is_ok());

    service.revoke_access_token(&token).await.unwrap();
    let result = service.verify_access_token(&token).await;
    assert!(matches!(result, Err(DomainError::Token(TokenError::Revoked))));

    let result = service.revoke_access_token("garbage").await;
    assert!(matches!(result, Err(DomainError::Token(TokenError::Malformed))));
}

#[tokio::test]
async fn test_stats_and_cleanup() {
    let repo = MockRefreshTokenRepository::new();
    let clock = clock();
    let service = token_service(&repo, &clock);
    let subject = Uuid::new_v4();

    let revoked = service.issue_refresh_token(subject, EntityType::User, None, None).await.unwrap();
    service.revoke(&revoked, "logout").await.unwrap();
    clock.advance(Duration::days(6));
    service.issue_refresh_token(subject, EntityType::User, None, None).await.unwrap();
    service.revoke_access_token(&service.issue_access_token(&admin()).unwrap()).await.unwrap();

    clock.advance(Duration::days(2));
    let stats = service.stats().await.unwrap();
    assert_eq!(stats.active_refresh_tokens, 1);
    assert_eq!(stats.revoked_refresh_tokens, 1);
    assert_eq!(stats.expired_refresh_tokens, 1);
    assert_eq!(stats.revoked_access_tokens, 1);

    // Revocation does not protect an expired row from deletion
    assert_eq!(service.cleanup_expired().await.unwrap(), 1);
    assert_eq!(repo.len().await, 1);
}
