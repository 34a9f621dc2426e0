//! Domain entities representing core business objects.

pub mod principal;
pub mod token;


// Re-export commonly used types
pub use principal::{EntityType, Principal, PrincipalSummary, Role};
pub use token::{
    revocation_reason, Claims, RefreshToken, TokenPair, TokenStats,
    ACCESS_TOKEN_EXPIRY_MINUTES, JWT_AUDIENCE, JWT_ISSUER, REFRESH_TOKEN_EXPIRY_DAYS,
    TOKEN_TYPE_BEARER,
};
