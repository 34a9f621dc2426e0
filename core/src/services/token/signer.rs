//! HS256 access token signing and verification.

use std::collections::HashSet;
use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use h2h_shared::config::auth::{JwtConfig, MIN_SECRET_BYTES};

use crate::domain::entities::principal::PrincipalSummary;
use crate::domain::entities::token::Claims;
use crate::errors::{DomainError, TokenError};
use crate::repositories::RevokedTokenStore;
use crate::services::clock::{Clock, SystemClock};

/// Signs and verifies access tokens with a shared secret
///
/// Expiry is checked against the injected [`Clock`] rather than inside
/// `jsonwebtoken`, with no leeway. A token whose `jti` is in the revoked
/// store is rejected even when its signature and lifetime are valid.
pub struct Signer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    access_lifetime: chrono::Duration,
    revoked: Arc<dyn RevokedTokenStore>,
    clock: Arc<dyn Clock>,
}

impl Signer {
    /// Creates a signer from the JWT configuration
    ///
    /// # Returns
    ///
    /// * `Err(DomainError::Internal)` - The secret is absent or shorter than 32 bytes
    pub fn new(config: &JwtConfig, revoked: Arc<dyn RevokedTokenStore>) -> Result<Self, DomainError> {
        if !config.has_strong_secret() {
            return Err(DomainError::internal(format!(
                "JWT secret must be at least {} bytes",
                MIN_SECRET_BYTES
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims =
            ["exp", "iss", "aud", "sub"].iter().map(|c| c.to_string()).collect();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_lifetime: chrono::Duration::minutes(config.access_token_expiry_minutes),
            revoked,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sign a fresh access token for the principal
    ///
    /// Every call embeds a new `jti`, so two tokens for the same principal
    /// issued within the same second still differ.
    pub fn sign(&self, principal: &PrincipalSummary) -> Result<String, DomainError> {
        let claims = Claims::new_access_token(
            principal,
            self.clock.now(),
            self.access_lifetime,
            &self.issuer,
            &self.audience,
        );
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::GenerationFailed))
    }

    /// Verify signature, issuer, audience, expiry and revocation
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The token is valid and not revoked
    /// * `Err(TokenError::InvalidSignature)` - Bad signature, issuer or audience
    /// * `Err(TokenError::Expired)` - `exp` is not in the future
    /// * `Err(TokenError::Malformed)` - Not a decodable token
    /// * `Err(TokenError::Revoked)` - The `jti` was revoked
    /// * `Err(DomainError::Internal)` - The revoked store could not be consulted
    pub async fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                let error = match e.kind() {
                    JwtErrorKind::InvalidSignature
                    | JwtErrorKind::InvalidIssuer
                    | JwtErrorKind::InvalidAudience
                    | JwtErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
                    JwtErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Malformed,
                };
                DomainError::Token(error)
            })?
            .claims;

        if claims.is_expired_at(self.clock.now()) {
            return Err(DomainError::Token(TokenError::Expired));
        }

        if self.revoked.contains(&claims.jti).await? {
            return Err(DomainError::Token(TokenError::Revoked));
        }

        Ok(claims)
    }

    /// Decode a token's claims without checking signature, expiry or audience
    ///
    /// Only for best-effort revocation of a token the caller is giving up.
    pub fn decode_unverified(&self, token: &str) -> Result<Claims, DomainError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|_| DomainError::Token(TokenError::Malformed))
    }

    /// Store of revoked access token ids consulted by [`Signer::verify`]
    pub fn revoked_store(&self) -> &Arc<dyn RevokedTokenStore> {
        &self.revoked
    }

    pub fn access_lifetime(&self) -> chrono::Duration {
        self.access_lifetime
    }
}
