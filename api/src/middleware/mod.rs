//! Request middleware: access token authentication and authorization guards
//!
//! Guards read the [`AuthContext`] injected by [`JwtAuth`], so they must be
//! wrapped inside it (actix applies the last `wrap` first):
//!
//! ```ignore
//! web::resource("/projects/{id}")
//!     .wrap(RequireOwnership::new(resolver, ResourceType::Project))
//!     .wrap(JwtAuth::new(signer))
//! ```

pub mod auth;
pub mod guard;
pub mod ownership;
pub mod role;

pub use auth::{bearer_token, AuthContext, JwtAuth};
pub use guard::{GuardMiddleware, RequestGuard};
pub use ownership::RequireOwnership;
pub use role::{RequireEntityType, RequireRole};

use actix_web::{
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    ResponseError,
};

use crate::handlers::ApiError;

/// Short-circuit a request with a JSON error response
pub(crate) fn reject<B>(req: ServiceRequest, error: ApiError) -> ServiceResponse<EitherBody<B>> {
    let response = error.error_response();
    req.into_response(response).map_into_right_body()
}
