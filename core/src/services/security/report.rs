use chrono::{DateTime, Utc};
use serde::Serialize;

use h2h_shared::config::AuthConfig;

use crate::domain::entities::token::TokenStats;

/// Revoked access token ids held in memory above which a restart is suggested
const REVOKED_ACCESS_TOKENS_THRESHOLD: u64 = 1000;

/// Snapshot of token state and configuration advice for operators
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityReport {
    pub token_stats: TokenStats,
    pub cleanup_scheduled: bool,
    pub generated_at: DateTime<Utc>,
    pub security_recommendations: Vec<String>,
}

impl SecurityReport {
    pub fn build(stats: TokenStats, config: &AuthConfig, cleanup_scheduled: bool) -> Self {
        let mut recommendations = Vec::new();

        if stats.revoked_access_tokens > REVOKED_ACCESS_TOKENS_THRESHOLD {
            recommendations.push(
                "Consider restarting the service to clear the revoked access token cache"
                    .to_string(),
            );
        }
        if stats.revoked_refresh_tokens > stats.active_refresh_tokens {
            recommendations.push(
                "High number of revoked tokens detected - review security policies".to_string(),
            );
        }
        if !config.jwt.has_strong_secret() {
            recommendations.push("JWT_SECRET should be at least 32 bytes long".to_string());
        }
        if !cleanup_scheduled {
            recommendations.push("Expired token cleanup is not running".to_string());
        }

        Self {
            token_stats: stats,
            cleanup_scheduled,
            generated_at: Utc::now(),
            security_recommendations: recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use h2h_shared::config::auth::JwtConfig;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt: JwtConfig::new("x".repeat(48)),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn healthy_state_has_no_recommendations() {
        let stats = TokenStats {
            active_refresh_tokens: 10,
            revoked_refresh_tokens: 2,
            ..TokenStats::default()
        };
        let report = SecurityReport::build(stats, &config(), true);
        assert!(report.security_recommendations.is_empty());
    }

    #[test]
    fn flags_every_condition() {
        let stats = TokenStats {
            active_refresh_tokens: 1,
            revoked_refresh_tokens: 5,
            expired_refresh_tokens: 0,
            revoked_access_tokens: 1001,
        };
        let report = SecurityReport::build(stats, &AuthConfig::default(), false);
        assert_eq!(report.security_recommendations.len(), 4);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["tokenStats"]["revokedAccessTokens"], 1001);
        assert_eq!(json["cleanupScheduled"], false);
    }
}
