//! Type definitions shared by the HTTP layer
//!
//! - `response` - health check payloads

pub mod response;

pub use response::{HealthResponse, HealthStatus};
