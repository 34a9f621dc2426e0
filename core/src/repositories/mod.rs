//! Repository interfaces the services depend on.
//!
//! Persistent implementations live in the infrastructure crate. The
//! in-memory implementations here back the unit tests and, behind the
//! `test-support` feature, other crates' integration tests.

pub mod ownership;
pub mod principal;
pub mod revoked;
pub mod token;

pub use ownership::OwnershipRepository;
pub use principal::PrincipalRepository;
pub use revoked::{InMemoryRevokedTokenStore, RevokedTokenStore};
pub use token::{RefreshTokenRepository, RefreshTokenStats, Redemption};

#[cfg(any(test, feature = "test-support"))]
pub use ownership::MockOwnershipRepository;
#[cfg(any(test, feature = "test-support"))]
pub use principal::MockPrincipalRepository;
#[cfg(any(test, feature = "test-support"))]
pub use token::MockRefreshTokenRepository;
