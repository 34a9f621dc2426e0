//! Configuration for the token service

use chrono::Duration;
use h2h_shared::config::AuthConfig;

/// Lifetimes applied when issuing tokens
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Access token lifetime
    pub access_token_lifetime: Duration,
    /// Refresh token lifetime
    pub refresh_token_lifetime: Duration,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            access_token_lifetime: Duration::minutes(15),
            refresh_token_lifetime: Duration::days(7),
        }
    }
}

impl TokenServiceConfig {
    pub fn from_auth_config(config: &AuthConfig) -> Self {
        Self {
            access_token_lifetime: Duration::minutes(config.jwt.access_token_expiry_minutes),
            refresh_token_lifetime: Duration::days(config.jwt.refresh_token_expiry_days),
        }
    }

    /// Access lifetime as shown to clients, e.g. `15m`
    pub fn expires_in(&self) -> String {
        let minutes = self.access_token_lifetime.num_minutes();
        if minutes > 0 && minutes % 60 == 0 {
            format!("{}h", minutes / 60)
        } else {
            format!("{}m", minutes)
        }
    }
}
