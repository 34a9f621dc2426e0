//! Authentication and authorization configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// Minimum length of the HS256 signing secret in bytes
pub const MIN_SECRET_BYTES: usize = 32;

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// HMAC secret used to sign access tokens
    #[serde(skip_serializing)]
    pub secret: String,

    /// Access token lifetime in minutes
    pub access_token_expiry_minutes: i64,

    /// Refresh token lifetime in days
    pub refresh_token_expiry_days: i64,

    /// `iss` claim embedded in and required from every access token
    pub issuer: String,

    /// `aud` claim embedded in and required from every access token
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
            issuer: String::from("happy2help-backend"),
            audience: String::from("happy2help-client"),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry_minutes = minutes;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry_days = days;
        self
    }

    /// Whether the secret satisfies the minimum length for HS256
    pub fn has_strong_secret(&self) -> bool {
        self.secret.len() >= MIN_SECRET_BYTES
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// bcrypt work factor for password hashes
    pub bcrypt_cost: u32,

    /// How often the expired refresh token sweep runs, in seconds
    pub cleanup_interval_seconds: u64,

    /// Deadline for a single ownership lookup, in milliseconds
    pub ownership_lookup_timeout_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            bcrypt_cost: 10,
            cleanup_interval_seconds: 3600,
            ownership_lookup_timeout_ms: 2000,
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    ///
    /// A missing `JWT_SECRET` yields an empty secret; startup validation
    /// rejects it before any token is signed.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").unwrap_or_default(),
            access_token_expiry_minutes: env_or(
                "JWT_ACCESS_TOKEN_EXPIRY_MINUTES",
                defaults.jwt.access_token_expiry_minutes,
            ),
            refresh_token_expiry_days: env_or(
                "JWT_REFRESH_TOKEN_EXPIRY_DAYS",
                defaults.jwt.refresh_token_expiry_days,
            ),
            ..defaults.jwt
        };

        Self {
            jwt,
            bcrypt_cost: env_or("SALT_ROUNDS", defaults.bcrypt_cost),
            cleanup_interval_seconds: env_or(
                "TOKEN_CLEANUP_INTERVAL_SECS",
                defaults.cleanup_interval_seconds,
            ),
            ownership_lookup_timeout_ms: env_or(
                "OWNERSHIP_LOOKUP_TIMEOUT_MS",
                defaults.ownership_lookup_timeout_ms,
            ),
        }
    }

    /// Get the JWT secret
    pub fn jwt_secret(&self) -> &str {
        &self.jwt.secret
    }

    /// Access token lifetime rendered the way clients receive it, e.g. `15m`
    pub fn access_token_expires_in(&self) -> String {
        format!("{}m", self.jwt.access_token_expiry_minutes)
    }
}
