//! MySQL repository implementations

mod ownership_repository_impl;
mod principal_repository_impl;
mod refresh_token_repository_impl;

pub use ownership_repository_impl::MySqlOwnershipRepository;
pub use principal_repository_impl::MySqlPrincipalRepository;
pub use refresh_token_repository_impl::MySqlRefreshTokenRepository;

use h2h_core::errors::DomainError;
use uuid::Uuid;

/// Wrap a SQLx failure as an internal domain error
pub(crate) fn db_error(action: &str, e: sqlx::Error) -> DomainError {
    tracing::error!(error = %e, "Failed to {}", action);
    DomainError::Internal {
        message: format!("Failed to {}: {}", action, e),
    }
}

pub(crate) fn parse_uuid(value: &str, what: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(value).map_err(|e| DomainError::Internal {
        message: format!("Invalid {} UUID: {}", what, e),
    })
}
