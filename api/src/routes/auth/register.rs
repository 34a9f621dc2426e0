use actix_web::{web, HttpResponse, ResponseError};
use validator::Validate;

use h2h_core::repositories::{PrincipalRepository, RefreshTokenRepository};

use super::{entity_type_param, AppState};
use crate::dto::CredentialsRequest;
use crate::handlers::{handle_domain_error, ApiError};

/// Handler for POST /api/v1/auth/{user|ngo}/register
///
/// # Request Body
///
/// ```json
/// { "email": "string", "password": "string (at least 10 chars)" }
/// ```
///
/// # Response
///
/// - 201 Created: the new principal, password hash omitted
/// - 400 Bad Request: missing fields, invalid email or short password
/// - 409 Conflict: email already registered for this entity type
pub async fn register<P, R>(
    state: web::Data<AppState<P, R>>,
    path: web::Path<String>,
    request: web::Json<CredentialsRequest>,
) -> HttpResponse
where
    P: PrincipalRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    let entity_type = match entity_type_param(&path) {
        Ok(entity_type) => entity_type,
        Err(e) => return e.error_response(),
    };
    if let Err(errors) = request.validate() {
        return ApiError::from(errors).error_response();
    }

    match state
        .auth_service
        .register_account(&request.email, &request.password, entity_type)
        .await
    {
        Ok(principal) => HttpResponse::Created().json(principal),
        Err(e) => handle_domain_error(e),
    }
}
