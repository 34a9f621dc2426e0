//! Credential validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum accepted password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 10;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Check an address against the basic `local@domain.tld` shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Passwords are measured in characters, not bytes
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}

/// Canonical form used for login email lookups and storage
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
