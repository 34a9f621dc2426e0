//! Business services containing domain logic and use cases.

pub mod auth;
pub mod authorization;
pub mod clock;
pub mod security;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig};
pub use authorization::OwnershipResolver;
pub use clock::{Clock, SystemClock};
pub use security::{validate_security_settings, SecurityReport, SecuritySettingsCheck};
pub use token::{
    CleanupResult, Signer, TokenCleanupConfig, TokenCleanupService, TokenService,
    TokenServiceConfig,
};

#[cfg(any(test, feature = "test-support"))]
pub use clock::ManualClock;
