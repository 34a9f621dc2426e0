use actix_web::{web, HttpRequest, HttpResponse};

use h2h_core::repositories::{PrincipalRepository, RefreshTokenRepository};

use super::{client_ip, user_agent, AppState};
use crate::dto::RefreshTokenRequest;
use crate::handlers::handle_domain_error;

/// Handler for POST /api/v1/auth/refresh
///
/// Rotates a refresh token: the presented token is revoked and a new
/// access token and refresh token are returned. A token can be rotated
/// only once.
///
/// # Request Body
///
/// ```json
/// { "refreshToken": "string" }
/// ```
///
/// ## Errors
/// - 400 Bad Request: missing refresh token
/// - 401 Unauthorized: unknown, revoked, expired or already rotated token,
///   or a disabled account
pub async fn refresh<P, R>(
    req: HttpRequest,
    state: web::Data<AppState<P, R>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    P: PrincipalRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    match state
        .auth_service
        .refresh(
            &request.refresh_token,
            client_ip(&req, &state.trusted_proxies),
            user_agent(&req),
        )
        .await
    {
        Ok(pair) => HttpResponse::Ok().json(pair),
        Err(e) => handle_domain_error(e),
    }
}
