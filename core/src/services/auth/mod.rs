//! Authentication service module
//!
//! This module provides:
//! - Email and password registration rules
//! - Login with uniform failure messages
//! - Logout, refresh token rotation and banning

mod config;
mod password;
mod service;


pub use config::AuthServiceConfig;
pub use password::{hash_password, verify_password};
pub use service::AuthService;
