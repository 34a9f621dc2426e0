//! Mock implementation of RefreshTokenRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::principal::EntityType;
use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;
use crate::services::token::digests_match;

use super::r#trait::{RefreshTokenRepository, RefreshTokenStats, Redemption};

/// Mock refresh token repository keyed by token hash
#[derive(Clone)]
pub struct MockRefreshTokenRepository {
    tokens: Arc<RwLock<HashMap<String, RefreshToken>>>,
    fail: Arc<AtomicBool>,
}

impl MockRefreshTokenRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
            fail: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent call fail with an internal error
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of stored rows, revoked and expired included
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    /// All rows issued to a subject
    pub async fn tokens_for(&self, subject_id: Uuid) -> Vec<RefreshToken> {
        self.tokens
            .read()
            .await
            .values()
            .filter(|t| t.subject_id == subject_id)
            .cloned()
            .collect()
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::internal("refresh token store unavailable"));
        }
        Ok(())
    }
}

fn find_mut<'a>(
    tokens: &'a mut HashMap<String, RefreshToken>,
    token_hash: &str,
) -> Option<&'a mut RefreshToken> {
    tokens
        .values_mut()
        .find(|t| digests_match(&t.token_hash, token_hash))
}

impl Default for MockRefreshTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RefreshTokenRepository for MockRefreshTokenRepository {
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        self.check()?;
        let mut tokens = self.tokens.write().await;

        if tokens.contains_key(&token.token_hash) {
            return Err(DomainError::Conflict {
                message: "Refresh token already exists".to_string(),
            });
        }

        tokens.insert(token.token_hash.clone(), token.clone());
        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError> {
        self.check()?;
        let tokens = self.tokens.read().await;
        Ok(tokens
            .values()
            .find(|t| digests_match(&t.token_hash, token_hash))
            .cloned())
    }

    async fn redeem(
        &self,
        token_hash: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<Redemption, DomainError> {
        self.check()?;
        // Check and revoke under one write guard
        let mut tokens = self.tokens.write().await;

        match find_mut(&mut tokens, token_hash) {
            None => Ok(Redemption::NotFound),
            Some(token) if !token.is_active_at(now) => Ok(Redemption::Inactive),
            Some(token) => {
                let before = token.clone();
                token.revoke(reason, now);
                Ok(Redemption::Redeemed(before))
            }
        }
    }

    async fn revoke(
        &self,
        token_hash: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        self.check()?;
        let mut tokens = self.tokens.write().await;

        if let Some(token) = find_mut(&mut tokens, token_hash) {
            token.revoke(reason, now);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn revoke_all_for_subject(
        &self,
        subject_id: Uuid,
        entity_type: EntityType,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        self.check()?;
        let mut tokens = self.tokens.write().await;
        let mut count = 0;

        for token in tokens.values_mut() {
            if token.subject_id == subject_id
                && token.entity_type == entity_type
                && token.is_active_at(now)
            {
                token.revoke(reason, now);
                count += 1;
            }
        }

        Ok(count)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        self.check()?;
        let mut tokens = self.tokens.write().await;
        let initial_count = tokens.len();

        tokens.retain(|_, token| token.expires_at >= now);

        Ok(initial_count - tokens.len())
    }

    async fn stats(&self, now: DateTime<Utc>) -> Result<RefreshTokenStats, DomainError> {
        self.check()?;
        let tokens = self.tokens.read().await;

        let mut stats = RefreshTokenStats::default();
        for token in tokens.values() {
            if token.is_active_at(now) {
                stats.active += 1;
            }
            if token.is_revoked {
                stats.revoked += 1;
            }
            if token.expires_at < now {
                stats.expired += 1;
            }
        }

        Ok(stats)
    }
}
