use serde::Serialize;

use h2h_shared::config::auth::{AuthConfig, MIN_SECRET_BYTES};

/// Lowest and highest work factors bcrypt accepts
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Work factor below which a warning is raised
const RECOMMENDED_BCRYPT_COST: u32 = 10;

/// Outcome of [`validate_security_settings`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SecuritySettingsCheck {
    /// Problems that must stop the server from starting
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl SecuritySettingsCheck {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check the authentication settings before anything is signed or hashed
pub fn validate_security_settings(config: &AuthConfig) -> SecuritySettingsCheck {
    let mut check = SecuritySettingsCheck::default();

    if config.jwt.secret.is_empty() {
        check
            .errors
            .push("JWT_SECRET environment variable is required".to_string());
    } else if !config.jwt.has_strong_secret() {
        check.errors.push(format!(
            "JWT_SECRET must be at least {} bytes long",
            MIN_SECRET_BYTES
        ));
    }

    if !BCRYPT_COST_RANGE.contains(&config.bcrypt_cost) {
        check.errors.push(format!(
            "SALT_ROUNDS must be between {} and {}",
            BCRYPT_COST_RANGE.start(),
            BCRYPT_COST_RANGE.end()
        ));
    } else if config.bcrypt_cost < RECOMMENDED_BCRYPT_COST {
        check.warnings.push(format!(
            "SALT_ROUNDS should be at least {} for better security",
            RECOMMENDED_BCRYPT_COST
        ));
    }

    if config.cleanup_interval_seconds == 0 {
        check
            .errors
            .push("TOKEN_CLEANUP_INTERVAL_SECS must be greater than zero".to_string());
    }

    if config.jwt.access_token_expiry_minutes <= 0 {
        check
            .errors
            .push("JWT_ACCESS_TOKEN_EXPIRY_MINUTES must be greater than zero".to_string());
    }
    if config.jwt.refresh_token_expiry_days <= 0 {
        check
            .errors
            .push("JWT_REFRESH_TOKEN_EXPIRY_DAYS must be greater than zero".to_string());
    }

    let access_minutes = config.jwt.access_token_expiry_minutes;
    let refresh_minutes = config.jwt.refresh_token_expiry_days.saturating_mul(24 * 60);
    if access_minutes >= refresh_minutes {
        check.warnings.push(
            "Access tokens should expire well before refresh tokens".to_string(),
        );
    }

    check
}
