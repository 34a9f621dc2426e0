//! Profile lookups guarded by ownership

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use h2h_core::domain::entities::principal::EntityType;
use h2h_core::errors::DomainError;
use h2h_core::repositories::{PrincipalRepository, RefreshTokenRepository};

use super::AppState;
use crate::handlers::handle_domain_error;

/// Handler for GET /users/{id} and GET /ngos/{id}
///
/// Returns the principal with its password hash redacted. The route is
/// expected to sit behind `JwtAuth` and `RequireOwnership`.
pub async fn get_principal<P, R>(
    state: web::Data<AppState<P, R>>,
    entity_type: web::Data<EntityType>,
    path: web::Path<Uuid>,
) -> HttpResponse
where
    P: PrincipalRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    let entity_type = **entity_type;
    let id = path.into_inner();

    match state.principal_repository.find_by_id(entity_type, id).await {
        Ok(Some(principal)) => HttpResponse::Ok().json(principal),
        Ok(None) => handle_domain_error(DomainError::not_found(match entity_type {
            EntityType::User => "User",
            EntityType::Ngo => "NGO",
        })),
        Err(e) => handle_domain_error(e),
    }
}
