//! Domain-specific error types and error handling.

mod types;

pub use types::{TokenError, ValidationError};

use thiserror::Error;

/// Core domain errors
///
/// The first six variants form the taxonomy every caller maps onto a
/// transport status; the bridged enums carry the precise cause.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Coarse classification of a [`DomainError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Conflict,
    Unauthorized,
    Forbidden,
    NotFound,
    Internal,
}

impl DomainError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized { message: message.into() }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Which taxonomy bucket this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidInput { .. } | DomainError::Validation(_) => ErrorKind::InvalidInput,
            DomainError::Conflict { .. } => ErrorKind::Conflict,
            DomainError::Unauthorized { .. } => ErrorKind::Unauthorized,
            DomainError::Forbidden { .. } => ErrorKind::Forbidden,
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::Internal { .. } => ErrorKind::Internal,
            DomainError::Token(TokenError::GenerationFailed) => ErrorKind::Internal,
            DomainError::Token(_) => ErrorKind::Unauthorized,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
