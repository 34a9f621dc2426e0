use actix_web::{web, HttpResponse};

use h2h_core::repositories::{PrincipalRepository, RefreshTokenRepository};
use h2h_core::services::security::SecurityReport;

use super::AppState;
use crate::handlers::handle_domain_error;

/// Handler for GET /api/v1/auth/security/report (admin only)
///
/// Token counters plus recommendations derived from them and from the
/// running configuration.
pub async fn security_report<P, R>(state: web::Data<AppState<P, R>>) -> HttpResponse
where
    P: PrincipalRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    match state.auth_service.token_service().stats().await {
        Ok(stats) => HttpResponse::Ok().json(SecurityReport::build(
            stats,
            &state.auth_config,
            state.cleanup_scheduled(),
        )),
        Err(e) => handle_domain_error(e),
    }
}
