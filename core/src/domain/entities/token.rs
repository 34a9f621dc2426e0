//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::principal::{EntityType, PrincipalSummary, Role};

/// Access token expiration time (15 minutes)
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 15;

/// Refresh token expiration time (7 days)
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// JWT issuer
pub const JWT_ISSUER: &str = "happy2help-backend";

/// JWT audience
pub const JWT_AUDIENCE: &str = "happy2help-client";

/// Scheme clients put in front of access tokens
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Longest client address kept on a refresh token (textual IPv6)
pub const MAX_IP_ADDRESS_CHARS: usize = 45;

/// Longest user agent kept on a refresh token
pub const MAX_USER_AGENT_CHARS: usize = 500;

/// Reasons recorded on revoked refresh tokens
pub mod revocation_reason {
    pub const ROTATION: &str = "rotation";
    pub const LOGOUT: &str = "logout";
    pub const BANNED: &str = "banned";
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (principal ID)
    pub sub: String,

    pub email: String,

    pub role: Role,

    #[serde(rename = "entityType")]
    pub entity_type: EntityType,

    /// JWT ID, unique per issuance
    pub jti: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    pub iss: String,

    pub aud: String,
}

impl Claims {
    /// Creates new claims for an access token
    ///
    /// # Arguments
    ///
    /// * `principal` - Identity to embed
    /// * `issued_at` - Issuance instant
    /// * `lifetime` - How long the token stays valid
    /// * `issuer` / `audience` - Values checked again on verification
    pub fn new_access_token(
        principal: &PrincipalSummary,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
        issuer: &str,
        audience: &str,
    ) -> Self {
        Self {
            sub: principal.id.to_string(),
            email: principal.email.clone(),
            role: principal.role,
            entity_type: principal.entity_type,
            jti: Uuid::new_v4().to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
        }
    }

    /// Checks if the claims have expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Gets the principal ID from the claims
    pub fn subject_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Refresh token entity stored in the database
///
/// The opaque secret handed to the client is never stored; only its
/// SHA-256 digest is, which keeps the uniqueness guarantee while making a
/// leaked table useless for replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Unique identifier for the token record
    pub id: Uuid,

    /// Principal the token was issued to
    pub subject_id: Uuid,

    pub entity_type: EntityType,

    /// Hex SHA-256 digest of the secret
    pub token_hash: String,

    pub ip_address: Option<String>,

    pub user_agent: Option<String>,

    pub expires_at: DateTime<Utc>,

    pub is_revoked: bool,

    pub revoked_at: Option<DateTime<Utc>>,

    pub revoked_reason: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Creates a new, unrevoked refresh token record
    ///
    /// Client metadata longer than the stored column widths is truncated.
    pub fn new(
        subject_id: Uuid,
        entity_type: EntityType,
        token_hash: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_id,
            entity_type,
            token_hash,
            ip_address: ip_address.map(|ip| truncate_chars(ip, MAX_IP_ADDRESS_CHARS)),
            user_agent: user_agent.map(|ua| truncate_chars(ua, MAX_USER_AGENT_CHARS)),
            expires_at: issued_at + lifetime,
            is_revoked: false,
            revoked_at: None,
            revoked_reason: None,
            created_at: issued_at,
            updated_at: issued_at,
        }
    }

    /// Checks if the token is past its expiry at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// A token is active when it is neither revoked nor expired
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked && now < self.expires_at
    }

    /// Marks the token revoked. An already revoked token keeps its
    /// original reason and timestamp.
    pub fn revoke(&mut self, reason: &str, now: DateTime<Utc>) {
        if self.is_revoked {
            return;
        }
        self.is_revoked = true;
        self.revoked_at = Some(now);
        self.revoked_reason = Some(reason.to_string());
        self.updated_at = now;
    }
}

fn truncate_chars(mut value: String, max_chars: usize) -> String {
    if let Some((end, _)) = value.char_indices().nth(max_chars) {
        value.truncate(end);
    }
    value
}

/// Token pair returned after login or rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,

    /// Opaque refresh secret
    pub refresh_token: String,

    pub token_type: String,

    /// Access token lifetime as shown to clients, e.g. `15m`
    pub expires_in: String,
}

impl TokenPair {
    pub fn new(access_token: String, refresh_token: String, expires_in: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in,
        }
    }
}

/// Aggregate counters over the refresh token table and the revoked access
/// token ids
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStats {
    pub active_refresh_tokens: u64,
    pub revoked_refresh_tokens: u64,
    pub expired_refresh_tokens: u64,
    pub revoked_access_tokens: u64,
}
