use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use validator::Validate;

use h2h_core::repositories::{PrincipalRepository, RefreshTokenRepository};

use super::{client_ip, entity_type_param, user_agent, AppState};
use crate::dto::CredentialsRequest;
use crate::handlers::{handle_domain_error, ApiError};

/// Handler for POST /api/v1/auth/{user|ngo}/login
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "principal": { "id": "...", "loginEmail": "...", "role": "user", ... },
///     "accessToken": "eyJ...",
///     "refreshToken": "9f3c...",
///     "tokenType": "Bearer",
///     "expiresIn": "15m"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: missing fields
/// - 401 Unauthorized: unknown email, wrong password or disabled account,
///   all with the same message
pub async fn login<P, R>(
    req: HttpRequest,
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
        .login(
            &request.email,
            &request.password,
            entity_type,
            client_ip(&req, &state.trusted_proxies),
            user_agent(&req),
        )
        .await
    {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => handle_domain_error(e),
    }
}
