//! Ownership guard backed by the [`OwnershipResolver`]

use actix_web::{dev::ServiceRequest, HttpMessage};
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;
use std::sync::Arc;
use uuid::Uuid;

use h2h_core::domain::entities::principal::Role;
use h2h_core::domain::value_objects::ownership::ResourceType;
use h2h_core::services::authorization::OwnershipResolver;

use super::guard::{guard_transform, RequestGuard};
use super::AuthContext;
use crate::handlers::ApiError;

const DENIED: &str = "Access denied - must be owner or have required role";

/// Lets a request through when the caller owns the resource named by a
/// route parameter, or holds one of the override roles
///
/// Denials answer 403; a failed or timed out lookup answers 500.
#[derive(Clone)]
pub struct RequireOwnership {
    resolver: Arc<OwnershipResolver>,
    resource_type: ResourceType,
    param: &'static str,
    allowed_roles: Vec<Role>,
}

impl RequireOwnership {
    /// Guard reading the resource id from the `id` route parameter, with
    /// admins allowed through
    pub fn new(resolver: Arc<OwnershipResolver>, resource_type: ResourceType) -> Self {
        Self {
            resolver,
            resource_type,
            param: "id",
            allowed_roles: vec![Role::Admin],
        }
    }

    /// Read the resource id from another route parameter
    pub fn param(mut self, name: &'static str) -> Self {
        self.param = name;
        self
    }

    /// Replace the roles that bypass the ownership check
    pub fn allowed_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.allowed_roles = roles.into_iter().collect();
        self
    }
}

impl RequestGuard for RequireOwnership {
    fn check(&self, req: &ServiceRequest) -> LocalBoxFuture<'static, Result<(), ApiError>> {
        let context = req.extensions().get::<AuthContext>().cloned();
        let raw_id = req.match_info().get(self.param).map(str::to_owned);
        let guard = self.clone();

        async move {
            let Some(context) = context else {
                return Err(ApiError::unauthorized("Authentication required"));
            };
            let requester = context.requester();

            let resource_id = match raw_id.as_deref().map(Uuid::parse_str) {
                Some(Ok(id)) => id,
                // An id that cannot exist is only reachable through a role override
                _ if guard.allowed_roles.contains(&requester.role) => return Ok(()),
                _ => return Err(ApiError::forbidden(DENIED)),
            };

            let decision = guard
                .resolver
                .authorize(
                    &requester,
                    guard.resource_type,
                    resource_id,
                    &guard.allowed_roles,
                )
                .await
                .map_err(ApiError::from)?;

            if decision.is_allowed() {
                Ok(())
            } else {
                Err(ApiError::forbidden(DENIED))
            }
        }
        .boxed_local()
    }
}

guard_transform!(RequireOwnership);
