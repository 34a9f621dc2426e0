use actix_web::{web, HttpResponse};

use h2h_core::repositories::{PrincipalRepository, RefreshTokenRepository};

use super::AppState;
use crate::dto::{BanRequest, BanResponse, MessageResponse};
use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;

/// Handler for POST /api/v1/auth/ban (admin only)
///
/// Disables the account and revokes its refresh tokens. Access tokens
/// already issued keep working until they expire.
///
/// # Response
///
/// - 200 OK: `{ "revokedTokens": 2 }`
/// - 404 Not Found: no such principal
pub async fn ban<P, R>(
    admin: AuthContext,
    state: web::Data<AppState<P, R>>,
    request: web::Json<BanRequest>,
) -> HttpResponse
where
    P: PrincipalRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    match state
        .auth_service
        .ban(request.user_id, request.entity_type)
        .await
    {
        Ok(revoked_tokens) => {
            tracing::info!(
                admin_id = %admin.id,
                subject_id = %request.user_id,
                entity_type = %request.entity_type,
                revoked_tokens,
                "Ban issued"
            );
            HttpResponse::Ok().json(BanResponse { revoked_tokens })
        }
        Err(e) => handle_domain_error(e),
    }
}

/// Handler for POST /api/v1/auth/unban (admin only)
pub async fn unban<P, R>(
    admin: AuthContext,
    state: web::Data<AppState<P, R>>,
    request: web::Json<BanRequest>,
) -> HttpResponse
where
    P: PrincipalRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    match state
        .auth_service
        .unban(request.user_id, request.entity_type)
        .await
    {
        Ok(()) => {
            tracing::info!(
                admin_id = %admin.id,
                subject_id = %request.user_id,
                entity_type = %request.entity_type,
                "Ban lifted"
            );
            HttpResponse::Ok().json(MessageResponse::new("Account re-enabled"))
        }
        Err(e) => handle_domain_error(e),
    }
}
