//! Value objects representing immutable domain concepts.

pub mod auth_response;
pub mod ownership;

// Re-export commonly used types
pub use auth_response::LoginResponse;
pub use ownership::{AccessDecision, ApplicationOwners, Requester, ResourceType};
