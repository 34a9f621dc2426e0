//! Refresh token repository trait defining the interface for refresh token persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::principal::EntityType;
use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

/// Result of an atomic redeem-and-revoke attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redemption {
    /// The token was active and has now been revoked; carries the record as
    /// it was right before the revocation
    Redeemed(RefreshToken),
    /// No token matches the hash
    NotFound,
    /// The token exists but was already revoked or expired
    Inactive,
}

/// Counters over the refresh token table at a given instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshTokenStats {
    pub active: u64,
    pub revoked: u64,
    pub expired: u64,
}

/// Repository trait for RefreshToken entity persistence operations
///
/// Tokens are addressed by the SHA-256 digest of their secret. Rows are
/// written only by the token service (issue, rotate, revoke) and by the
/// expiry sweep (delete).
///
/// # Concurrency
/// `redeem` must be atomic: of two concurrent calls on the same active
/// token exactly one observes [`Redemption::Redeemed`]. A read followed
/// by a separate write does not satisfy this.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Save a new refresh token
    ///
    /// # Returns
    /// * `Ok(RefreshToken)` - The saved token
    /// * `Err(DomainError::Conflict)` - A token with the same hash exists
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Find a refresh token by the digest of its secret
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError>;

    /// Atomically revoke the token if it is active at `now`
    ///
    /// # Arguments
    /// * `token_hash` - Digest of the presented secret
    /// * `reason` - Recorded as `revoked_reason`
    /// * `now` - Instant used for the activity check and `revoked_at`
    async fn redeem(
        &self,
        token_hash: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<Redemption, DomainError>;

    /// Revoke a single token
    ///
    /// A token that is already revoked keeps its original reason.
    ///
    /// # Returns
    /// * `Ok(true)` - A token with this hash exists
    /// * `Ok(false)` - Token not found
    async fn revoke(
        &self,
        token_hash: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Revoke every token of the subject that is active at `now`
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of tokens that transitioned from active to revoked
    async fn revoke_all_for_subject(
        &self,
        subject_id: Uuid,
        entity_type: EntityType,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<usize, DomainError>;

    /// Delete every token whose `expires_at` is before `now`, revoked or not
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows deleted
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;

    /// Count active, revoked and expired tokens at `now`
    async fn stats(&self, now: DateTime<Utc>) -> Result<RefreshTokenStats, DomainError>;

    /// Check if a token exists and is active at `now`
    async fn is_active(&self, token_hash: &str, now: DateTime<Utc>) -> Result<bool, DomainError> {
        Ok(self
            .find_by_hash(token_hash)
            .await?
            .map(|token| token.is_active_at(now))
            .unwrap_or(false))
    }
}
