//! # Happy2Help Core
//!
//! Core domain layer for the Happy2Help backend.
//! This crate contains the token and principal entities, the authentication and
//! authorization services, the repository interfaces they depend on, and the
//! error types that form the foundation of the application architecture.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
