//! Login response value object for API responses.

use serde::{Deserialize, Serialize};

use crate::domain::entities::principal::Principal;
use crate::domain::entities::token::{TokenPair, TOKEN_TYPE_BEARER};

/// Response returned after a successful login
///
/// Carries the principal with its password hash redacted together with a
/// fresh access token and refresh secret.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub principal: Principal,

    pub access_token: String,

    pub refresh_token: String,

    /// Always `Bearer`
    pub token_type: String,

    /// Access token lifetime, e.g. `15m`
    pub expires_in: String,
}

impl LoginResponse {
    pub fn new(principal: Principal, tokens: TokenPair) -> Self {
        Self {
            principal,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: tokens.expires_in,
        }
    }
}
