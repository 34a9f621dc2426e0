//! Configuration module with business-specific sub-modules
//!
//! - `auth` - token lifetimes, signing secret, password hashing, sweep cadence
//! - `database` - database connection and pool configuration
//! - `environment` - environment detection
//! - `server` - HTTP server bind address

pub mod auth;
pub mod database;
pub mod environment;
pub mod server;

pub use auth::{AuthConfig, JwtConfig};
pub use database::DatabaseConfig;
pub use environment::Environment;
pub use server::ServerConfig;

/// Read an environment variable and parse it, falling back to `default`
/// when the variable is unset or unparsable.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
