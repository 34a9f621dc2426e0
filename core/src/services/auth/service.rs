//! Main authentication service implementation

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use uuid::Uuid;

use h2h_shared::utils::validation::{
    is_valid_email, is_valid_password, normalize_email, MIN_PASSWORD_LENGTH,
};

use crate::domain::entities::principal::{EntityType, Principal};
use crate::domain::entities::token::{revocation_reason, TokenPair};
use crate::domain::value_objects::LoginResponse;
use crate::errors::{DomainError, DomainResult, TokenError, ValidationError};
use crate::repositories::{PrincipalRepository, RefreshTokenRepository};
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;
use super::password::{hash_password, verify_password};

/// Message for every failed login, whatever the cause
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Message for every refused refresh
const INVALID_REFRESH_TOKEN: &str = "Invalid or expired refresh token";

/// Hashed once and checked on unknown emails so a miss costs a bcrypt round
const DECOY_PASSWORD: &str = "h2h-decoy-password-never-issued";

/// Authentication service for registration, login and session management
pub struct AuthService<P, R>
where
    P: PrincipalRepository,
    R: RefreshTokenRepository,
{
    /// Principal lookups and account state
    principal_repository: Arc<P>,
    /// Token service for JWT and refresh token management
    token_service: Arc<TokenService<R>>,
    /// Service configuration
    config: AuthServiceConfig,
    /// Hash of [`DECOY_PASSWORD`] at the configured cost, built on first miss
    pub(super) decoy_hash: OnceCell<String>,
}

impl<P, R> AuthService<P, R>
where
    P: PrincipalRepository + 'static,
    R: RefreshTokenRepository,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `principal_repository` - User and NGO account lookups
    /// * `token_service` - Service for token issuance and revocation
    /// * `config` - Service configuration
    pub fn new(
        principal_repository: Arc<P>,
        token_service: Arc<TokenService<R>>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            principal_repository,
            token_service,
            config,
            decoy_hash: OnceCell::new(),
        }
    }

    pub fn token_service(&self) -> &Arc<TokenService<R>> {
        &self.token_service
    }

    /// Validate registration input and hash the password
    ///
    /// The caller persists the returned hash together with the rest of the
    /// new account.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - bcrypt hash of the password
    /// * `Err(DomainError::Validation)` - Missing fields, bad email or short password
    /// * `Err(DomainError::Conflict)` - The email is taken for this entity type
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        entity_type: EntityType,
    ) -> DomainResult<String> {
        require_credentials(email, password)?;

        if !is_valid_email(email.trim()) {
            return Err(ValidationError::InvalidEmail.into());
        }
        if !is_valid_password(password) {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            }
            .into());
        }

        let email = normalize_email(email);
        if self
            .principal_repository
            .exists_by_email(entity_type, &email)
            .await?
        {
            return Err(DomainError::Conflict {
                message: format!("{} with this email already exists", label(entity_type)),
            });
        }

        hash_password(password, self.config.bcrypt_cost).await
    }

    /// Register and persist a new account with the entity type's default role
    pub async fn register_account(
        &self,
        email: &str,
        password: &str,
        entity_type: EntityType,
    ) -> DomainResult<Principal> {
        let password_hash = self.register(email, password, entity_type).await?;
        let principal = Principal::new(entity_type, normalize_email(email), password_hash);
        let created = self.principal_repository.create(principal).await?;

        info!(
            principal_id = %created.id,
            entity_type = %entity_type,
            "{} registered",
            label(entity_type)
        );
        Ok(created)
    }

    /// Authenticate and issue an access token plus a refresh token
    ///
    /// Unknown email, wrong password and disabled account all fail with
    /// the same `Unauthorized` message.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        entity_type: EntityType,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> DomainResult<LoginResponse> {
        require_credentials(email, password)?;

        let principal = match self
            .principal_repository
            .find_by_email(entity_type, &normalize_email(email))
            .await?
        {
            Some(principal) => principal,
            None => {
                self.check_decoy(password).await?;
                return Err(DomainError::unauthorized(INVALID_CREDENTIALS));
            }
        };

        if !verify_password(password, &principal.password_hash).await? {
            debug!(principal_id = %principal.id, "Password mismatch");
            return Err(DomainError::unauthorized(INVALID_CREDENTIALS));
        }

        if principal.is_disabled {
            warn!(principal_id = %principal.id, entity_type = %entity_type, "Login attempt on disabled account");
            return Err(DomainError::unauthorized(INVALID_CREDENTIALS));
        }

        let summary = principal.summary();
        let access_token = self.token_service.issue_access_token(&summary)?;
        let refresh_token = self
            .token_service
            .issue_refresh_token(principal.id, entity_type, ip_address, user_agent)
            .await?;

        info!(principal_id = %principal.id, entity_type = %entity_type, "Login successful");

        Ok(LoginResponse::new(
            principal,
            TokenPair::new(
                access_token,
                refresh_token,
                self.token_service.config().expires_in(),
            ),
        ))
    }

    /// Revoke a refresh token with reason `logout`
    ///
    /// Succeeds whether or not the token existed or was still active. When
    /// the caller also presents its access token, that token's id is
    /// revoked on a best-effort basis.
    ///
    /// # Returns
    ///
    /// * `Ok(bool)` - Whether a refresh token row matched
    pub async fn logout(&self, refresh_secret: &str, access_token: Option<&str>) -> DomainResult<bool> {
        if refresh_secret.trim().is_empty() {
            return Err(ValidationError::RequiredFields {
                fields: "refreshToken".to_string(),
            }
            .into());
        }

        let existed = self
            .token_service
            .revoke(refresh_secret, revocation_reason::LOGOUT)
            .await?;

        if let Some(token) = access_token {
            if let Err(e) = self.token_service.revoke_access_token(token).await {
                debug!(error = %e, "Could not revoke access token on logout");
            }
        }

        debug!(existed, "Logout processed");
        Ok(existed)
    }

    /// Rotate a refresh token into a new pair
    ///
    /// The principal is re-read so the new access token carries its current
    /// email and role; a missing or disabled principal is refused.
    pub async fn refresh(
        &self,
        refresh_secret: &str,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> DomainResult<TokenPair> {
        if refresh_secret.trim().is_empty() {
            return Err(ValidationError::RequiredFields {
                fields: "refreshToken".to_string(),
            }
            .into());
        }

        let principals = Arc::clone(&self.principal_repository);
        let result = self
            .token_service
            .rotate(refresh_secret, ip_address, user_agent, move |token| async move {
                match principals.find_by_id(token.entity_type, token.subject_id).await? {
                    Some(principal) if !principal.is_disabled => Ok(principal.summary()),
                    _ => {
                        warn!(
                            subject_id = %token.subject_id,
                            entity_type = %token.entity_type,
                            "Refresh refused for missing or disabled principal"
                        );
                        Err(DomainError::unauthorized(INVALID_REFRESH_TOKEN))
                    }
                }
            })
            .await;

        result.map_err(|e| match e {
            DomainError::Token(TokenError::NotFound | TokenError::Inactive) => {
                DomainError::unauthorized(INVALID_REFRESH_TOKEN)
            }
            other => other,
        })
    }

    /// Disable an account and revoke all its active refresh tokens
    ///
    /// Access tokens already handed out stay valid until they expire (at
    /// most the access token lifetime, 15 minutes by default); they are
    /// stateless and are not revoked here.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of refresh tokens revoked
    /// * `Err(DomainError::NotFound)` - No such principal
    pub async fn ban(&self, subject_id: Uuid, entity_type: EntityType) -> DomainResult<usize> {
        if !self
            .principal_repository
            .set_disabled(entity_type, subject_id, true)
            .await?
        {
            return Err(DomainError::not_found(label(entity_type)));
        }

        let revoked = self
            .token_service
            .revoke_all(subject_id, entity_type, revocation_reason::BANNED)
            .await?;

        warn!(
            subject_id = %subject_id,
            entity_type = %entity_type,
            revoked_tokens = revoked,
            "Principal banned"
        );
        Ok(revoked)
    }

    /// Spend one bcrypt verification so unknown emails answer as slowly as
    /// wrong passwords
    async fn check_decoy(&self, password: &str) -> DomainResult<()> {
        let decoy = self
            .decoy_hash
            .get_or_try_init(|| hash_password(DECOY_PASSWORD, self.config.bcrypt_cost))
            .await?;
        verify_password(password, decoy).await?;
        Ok(())
    }

    /// Re-enable a banned account. Revoked refresh tokens stay revoked.
    pub async fn unban(&self, subject_id: Uuid, entity_type: EntityType) -> DomainResult<()> {
        if !self
            .principal_repository
            .set_disabled(entity_type, subject_id, false)
            .await?
        {
            return Err(DomainError::not_found(label(entity_type)));
        }

        info!(subject_id = %subject_id, entity_type = %entity_type, "Principal re-enabled");
        Ok(())
    }
}

fn require_credentials(email: &str, password: &str) -> DomainResult<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ValidationError::RequiredFields {
            fields: "email, password".to_string(),
        }
        .into());
    }
    Ok(())
}

fn label(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::User => "User",
        EntityType::Ngo => "NGO",
    }
}
