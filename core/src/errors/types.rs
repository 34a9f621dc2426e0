//! Specific error types for token handling and input validation
//!
//! Messages are kept in English and deliberately terse. The HTTP layer
//! decides which of them are safe to echo back to clients.

use thiserror::Error;

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Signature, issuer or audience did not match
    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    /// Not a structurally valid compact JWT, or claims failed to decode
    #[error("Malformed token")]
    Malformed,

    /// The token id was explicitly revoked before its natural expiry
    #[error("Token revoked")]
    Revoked,

    /// No refresh token matches the presented secret
    #[error("Refresh token not found")]
    NotFound,

    /// The refresh token exists but is revoked or past its expiry
    #[error("Refresh token inactive")]
    Inactive,

    #[error("Token generation failed")]
    GenerationFailed,
}

/// Validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required fields missing: {fields}")]
    RequiredFields { fields: String },

    #[error("Please provide a valid email address")]
    InvalidEmail,

    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },
}
