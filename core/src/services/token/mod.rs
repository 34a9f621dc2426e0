//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - HS256 access token signing and verification
//! - Refresh token issuance, single-use rotation and revocation
//! - Background sweep of expired refresh tokens

mod cleanup;
mod config;
mod secret;
mod service;
mod signer;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, TokenCleanupConfig, TokenCleanupService};
pub use config::TokenServiceConfig;
pub use secret::{digests_match, generate_secret, hash_secret};
pub use service::TokenService;
pub use signer::Signer;
