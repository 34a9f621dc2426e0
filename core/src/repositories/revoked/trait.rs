//! Store of revoked access token ids.

use async_trait::async_trait;

use crate::errors::DomainError;

/// Set of access token `jti`s that must be rejected before their expiry
///
/// Entries only need to outlive the access token lifetime; the store may
/// forget an id once the token it names has expired.
#[async_trait]
pub trait RevokedTokenStore: Send + Sync {
    /// Record a revoked token id. Inserting twice is not an error.
    async fn insert(&self, jti: &str) -> Result<(), DomainError>;

    async fn contains(&self, jti: &str) -> Result<bool, DomainError>;

    /// Number of ids currently held
    async fn len(&self) -> Result<usize, DomainError>;
}
