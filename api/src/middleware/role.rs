//! Role and entity-type guards

use actix_web::{dev::ServiceRequest, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture};
use futures_util::FutureExt;

use h2h_core::domain::entities::principal::{EntityType, Role};

use super::guard::{guard_transform, RequestGuard};
use super::AuthContext;
use crate::handlers::ApiError;

fn context(req: &ServiceRequest) -> Result<AuthContext, ApiError> {
    req.extensions()
        .get::<AuthContext>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))
}

/// Only lets through callers holding one of the given roles
#[derive(Debug, Clone)]
pub struct RequireRole {
    roles: Vec<Role>,
}

impl RequireRole {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            roles: roles.into_iter().collect(),
        }
    }

    pub fn admin() -> Self {
        Self::new([Role::Admin])
    }

    fn decide(&self, req: &ServiceRequest) -> Result<(), ApiError> {
        let context = context(req)?;
        if self.roles.contains(&context.role) {
            Ok(())
        } else {
            tracing::debug!(principal_id = %context.id, role = %context.role, "Role not permitted");
            Err(ApiError::forbidden("Insufficient permissions"))
        }
    }
}

impl RequestGuard for RequireRole {
    fn check(&self, req: &ServiceRequest) -> LocalBoxFuture<'static, Result<(), ApiError>> {
        ready(self.decide(req)).boxed_local()
    }
}

guard_transform!(RequireRole);

/// Only lets through callers of the given entity types
#[derive(Debug, Clone)]
pub struct RequireEntityType {
    entity_types: Vec<EntityType>,
}

impl RequireEntityType {
    pub fn new(entity_types: impl IntoIterator<Item = EntityType>) -> Self {
        Self {
            entity_types: entity_types.into_iter().collect(),
        }
    }

    fn decide(&self, req: &ServiceRequest) -> Result<(), ApiError> {
        let context = context(req)?;
        if self.entity_types.contains(&context.entity_type) {
            Ok(())
        } else {
            Err(ApiError::forbidden(format!(
                "Access denied for {}s",
                context.entity_type
            )))
        }
    }
}

impl RequestGuard for RequireEntityType {
    fn check(&self, req: &ServiceRequest) -> LocalBoxFuture<'static, Result<(), ApiError>> {
        ready(self.decide(req)).boxed_local()
    }
}

guard_transform!(RequireEntityType);
