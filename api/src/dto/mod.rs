pub mod auth;

pub use auth::*;
pub use h2h_shared::errors::ErrorResponse;
