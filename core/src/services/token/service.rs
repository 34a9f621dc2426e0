//! Main token service implementation

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::principal::{EntityType, PrincipalSummary};
use crate::domain::entities::token::{revocation_reason, Claims, RefreshToken, TokenPair, TokenStats};
use crate::errors::{DomainError, TokenError};
use crate::repositories::{RefreshTokenRepository, Redemption};
use crate::services::clock::{Clock, SystemClock};

use super::config::TokenServiceConfig;
use super::secret::{generate_secret, hash_secret};
use super::signer::Signer;

/// Attempts at drawing a refresh secret whose digest is not yet stored
const MAX_SECRET_ATTEMPTS: usize = 3;

/// Service for managing access tokens and refresh tokens
pub struct TokenService<R: RefreshTokenRepository> {
    pub(crate) repository: Arc<R>,
    signer: Arc<Signer>,
    config: TokenServiceConfig,
    clock: Arc<dyn Clock>,
}

impl<R: RefreshTokenRepository> TokenService<R> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `repository` - Refresh token persistence
    /// * `signer` - Access token signer, shared with the request middleware
    /// * `config` - Token lifetimes
    pub fn new(repository: Arc<R>, signer: Arc<Signer>, config: TokenServiceConfig) -> Self {
        Self {
            repository,
            signer,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source used for refresh token expiry
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn signer(&self) -> &Arc<Signer> {
        &self.signer
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Issues a signed access token for the principal
    pub fn issue_access_token(&self, principal: &PrincipalSummary) -> Result<String, DomainError> {
        self.signer.sign(principal)
    }

    /// Verifies an access token; see [`Signer::verify`]
    pub async fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        self.signer.verify(token).await
    }

    /// Issues and persists a new refresh token
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The opaque secret to hand to the client; only its digest is stored
    pub async fn issue_refresh_token(
        &self,
        subject_id: Uuid,
        entity_type: EntityType,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Result<String, DomainError> {
        for _ in 0..MAX_SECRET_ATTEMPTS {
            let secret = generate_secret();
            let token = RefreshToken::new(
                subject_id,
                entity_type,
                hash_secret(&secret),
                ip_address.clone(),
                user_agent.clone(),
                self.clock.now(),
                self.config.refresh_token_lifetime,
            );

            match self.repository.save(token).await {
                Ok(_) => return Ok(secret),
                Err(DomainError::Conflict { .. }) => {
                    warn!(subject_id = %subject_id, "Refresh token digest collision, drawing a new secret");
                }
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::Token(TokenError::GenerationFailed))
    }

    /// Looks up an active refresh token without consuming it
    ///
    /// # Returns
    ///
    /// * `Ok(RefreshToken)` - The token exists and is active
    /// * `Err(TokenError::NotFound)` - No token has this secret
    /// * `Err(TokenError::Inactive)` - The token is revoked or expired
    pub async fn redeem_refresh_token(&self, secret: &str) -> Result<RefreshToken, DomainError> {
        let token = self
            .repository
            .find_by_hash(&hash_secret(secret))
            .await?
            .ok_or(DomainError::Token(TokenError::NotFound))?;

        if !token.is_active_at(self.clock.now()) {
            return Err(DomainError::Token(TokenError::Inactive));
        }

        Ok(token)
    }

    /// Rotates a refresh token into a new token pair
    ///
    /// The presented token is revoked with reason `rotation` in a single
    /// conditional store update before anything new is issued, so of two
    /// concurrent rotations of the same secret exactly one succeeds.
    ///
    /// `resolve` maps the redeemed token to the identity placed in the new
    /// access token; returning an error stops the rotation after the old
    /// token is already spent.
    pub async fn rotate<F, Fut>(
        &self,
        secret: &str,
        ip_address: Option<String>,
        user_agent: Option<String>,
        resolve: F,
    ) -> Result<TokenPair, DomainError>
    where
        F: FnOnce(RefreshToken) -> Fut + Send,
        Fut: Future<Output = Result<PrincipalSummary, DomainError>> + Send,
    {
        let redeemed = match self
            .repository
            .redeem(&hash_secret(secret), revocation_reason::ROTATION, self.clock.now())
            .await?
        {
            Redemption::Redeemed(token) => token,
            Redemption::NotFound => return Err(DomainError::Token(TokenError::NotFound)),
            Redemption::Inactive => return Err(DomainError::Token(TokenError::Inactive)),
        };

        let subject_id = redeemed.subject_id;
        let entity_type = redeemed.entity_type;
        let principal = resolve(redeemed).await?;

        let access_token = self.issue_access_token(&principal)?;
        let refresh_token = self
            .issue_refresh_token(subject_id, entity_type, ip_address, user_agent)
            .await?;

        debug!(subject_id = %subject_id, entity_type = %entity_type, "Refresh token rotated");

        Ok(TokenPair::new(access_token, refresh_token, self.config.expires_in()))
    }

    /// Revokes a single refresh token
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - A token with this secret exists
    /// * `Ok(false)` - Token not found
    pub async fn revoke(&self, secret: &str, reason: &str) -> Result<bool, DomainError> {
        self.repository
            .revoke(&hash_secret(secret), reason, self.clock.now())
            .await
    }

    /// Revokes every active refresh token of a principal
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of tokens that were active and are now revoked
    pub async fn revoke_all(
        &self,
        subject_id: Uuid,
        entity_type: EntityType,
        reason: &str,
    ) -> Result<usize, DomainError> {
        let count = self
            .repository
            .revoke_all_for_subject(subject_id, entity_type, reason, self.clock.now())
            .await?;

        info!(
            subject_id = %subject_id,
            entity_type = %entity_type,
            reason,
            revoked = count,
            "Revoked refresh tokens"
        );

        Ok(count)
    }

    /// Adds the access token's `jti` to the revoked set
    ///
    /// The token is only decoded, not verified; a forged token can at most
    /// revoke an id nobody holds.
    pub async fn revoke_access_token(&self, token: &str) -> Result<(), DomainError> {
        let claims = self.signer.decode_unverified(token)?;
        self.signer.revoked_store().insert(&claims.jti).await
    }

    /// Counters over refresh tokens and revoked access token ids
    pub async fn stats(&self) -> Result<TokenStats, DomainError> {
        let refresh = self.repository.stats(self.clock.now()).await?;
        let revoked_access = self.signer.revoked_store().len().await?;

        Ok(TokenStats {
            active_refresh_tokens: refresh.active,
            revoked_refresh_tokens: refresh.revoked,
            expired_refresh_tokens: refresh.expired,
            revoked_access_tokens: revoked_access as u64,
        })
    }

    /// Deletes refresh tokens past their expiry, revoked or not
    pub async fn cleanup_expired(&self) -> Result<usize, DomainError> {
        self.repository.delete_expired(self.clock.now()).await
    }
}
