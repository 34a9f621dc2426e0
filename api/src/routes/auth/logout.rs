use actix_web::{web, HttpRequest, HttpResponse};

use h2h_core::repositories::{PrincipalRepository, RefreshTokenRepository};

use super::AppState;
use crate::dto::{LogoutRequest, MessageResponse};
use crate::handlers::handle_domain_error;
use crate::middleware::bearer_token;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the refresh token. Answers 200 whether or not the token was
/// known, so the endpoint reveals nothing about token validity. When an
/// access token accompanies the request it is revoked as well.
///
/// ## Errors
/// - 400 Bad Request: missing refresh token
pub async fn logout<P, R>(
    req: HttpRequest,
    state: web::Data<AppState<P, R>>,
    request: web::Json<LogoutRequest>,
) -> HttpResponse
where
    P: PrincipalRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    let access_token = bearer_token(req.headers());

    match state
        .auth_service
        .logout(&request.refresh_token, access_token)
        .await
    {
        Ok(_) => HttpResponse::Ok().json(MessageResponse::new("Logged out successfully")),
        Err(e) => handle_domain_error(e),
    }
}
