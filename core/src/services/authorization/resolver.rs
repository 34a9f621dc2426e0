//! Ownership resolver: a registry of per-resource-type ownership checks.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::domain::entities::principal::{EntityType, Role};
use crate::domain::value_objects::ownership::{AccessDecision, Requester, ResourceType};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::OwnershipRepository;

/// Future returned by an ownership check; `Ok(true)` means the requester owns the resource
pub type ResolverFuture<'a> = BoxFuture<'a, DomainResult<bool>>;

type ResolverFn = Arc<
    dyn for<'a> Fn(&'a Requester, Uuid, &'a dyn OwnershipRepository) -> ResolverFuture<'a>
        + Send
        + Sync,
>;

/// Fail-closed authorization over registered resource types
///
/// Resolution order:
/// 1. A requester whose role is in `allowed_roles` is allowed, even if the
///    resource does not exist.
/// 2. Otherwise the resolver registered for the resource type decides.
///    Unregistered types and missing resources are denied.
/// 3. A failing or timed out lookup is an internal error, never an allow.
pub struct OwnershipResolver {
    lookups: Arc<dyn OwnershipRepository>,
    resolvers: HashMap<ResourceType, ResolverFn>,
    lookup_timeout: Duration,
}

impl OwnershipResolver {
    /// Resolver with the built-in checks for `none`, `user`, `ngo`,
    /// `project` and `application`
    pub fn new(lookups: Arc<dyn OwnershipRepository>, lookup_timeout: Duration) -> Self {
        let mut resolver = Self::empty(lookups, lookup_timeout);
        resolver.register(ResourceType::None, is_same_id);
        resolver.register(ResourceType::User, is_same_user);
        resolver.register(ResourceType::Ngo, is_same_ngo);
        resolver.register(ResourceType::Project, owns_project);
        resolver.register(ResourceType::Application, owns_application);
        resolver
    }

    /// Resolver with no registered resource types; everything not covered by
    /// a role override is denied
    pub fn empty(lookups: Arc<dyn OwnershipRepository>, lookup_timeout: Duration) -> Self {
        Self {
            lookups,
            resolvers: HashMap::new(),
            lookup_timeout,
        }
    }

    /// Register or replace the check for a resource type
    pub fn register<F>(&mut self, resource_type: ResourceType, check: F)
    where
        F: for<'a> Fn(&'a Requester, Uuid, &'a dyn OwnershipRepository) -> ResolverFuture<'a>
            + Send
            + Sync
            + 'static,
    {
        self.resolvers.insert(resource_type, Arc::new(check));
    }

    pub fn is_registered(&self, resource_type: ResourceType) -> bool {
        self.resolvers.contains_key(&resource_type)
    }

    pub fn lookup_timeout(&self) -> Duration {
        self.lookup_timeout
    }

    /// Decide access with the configured lookup deadline
    ///
    /// # Returns
    ///
    /// * `Ok(AccessDecision::Allow)` - Role override or ownership
    /// * `Ok(AccessDecision::Deny)` - Not the owner, unknown resource or unregistered type
    /// * `Err(DomainError::Internal)` - The ownership lookup failed or timed out
    pub async fn authorize(
        &self,
        requester: &Requester,
        resource_type: ResourceType,
        resource_id: Uuid,
        allowed_roles: &[Role],
    ) -> DomainResult<AccessDecision> {
        self.authorize_with_deadline(
            requester,
            resource_type,
            resource_id,
            allowed_roles,
            self.lookup_timeout,
        )
        .await
    }

    /// Decide access with a caller-supplied lookup deadline
    pub async fn authorize_with_deadline(
        &self,
        requester: &Requester,
        resource_type: ResourceType,
        resource_id: Uuid,
        allowed_roles: &[Role],
        deadline: Duration,
    ) -> DomainResult<AccessDecision> {
        if allowed_roles.contains(&requester.role) {
            debug!(role = %requester.role, resource_type = %resource_type, "Access granted by role");
            return Ok(AccessDecision::Allow);
        }

        let Some(check) = self.resolvers.get(&resource_type) else {
            warn!(resource_type = %resource_type, "No ownership resolver registered, denying");
            return Ok(AccessDecision::Deny);
        };

        let lookup = check(requester, resource_id, self.lookups.as_ref());
        match tokio::time::timeout(deadline, lookup).await {
            Ok(Ok(owned)) => {
                if !owned {
                    debug!(
                        requester_id = %requester.id,
                        resource_type = %resource_type,
                        resource_id = %resource_id,
                        "Ownership check denied"
                    );
                }
                Ok(AccessDecision::from_bool(owned))
            }
            Ok(Err(e)) => {
                error!(
                    resource_type = %resource_type,
                    resource_id = %resource_id,
                    error = %e,
                    "Ownership lookup failed"
                );
                Err(DomainError::internal("Ownership lookup failed"))
            }
            Err(_) => {
                error!(
                    resource_type = %resource_type,
                    resource_id = %resource_id,
                    timeout_ms = deadline.as_millis() as u64,
                    "Ownership lookup timed out"
                );
                Err(DomainError::internal("Ownership lookup timed out"))
            }
        }
    }
}

fn is_same_id<'a>(
    requester: &'a Requester,
    resource_id: Uuid,
    _lookups: &'a dyn OwnershipRepository,
) -> ResolverFuture<'a> {
    Box::pin(async move { Ok(requester.id == resource_id) })
}

fn is_same_user<'a>(
    requester: &'a Requester,
    resource_id: Uuid,
    _lookups: &'a dyn OwnershipRepository,
) -> ResolverFuture<'a> {
    Box::pin(async move { Ok(requester.is(EntityType::User, resource_id)) })
}

fn is_same_ngo<'a>(
    requester: &'a Requester,
    resource_id: Uuid,
    _lookups: &'a dyn OwnershipRepository,
) -> ResolverFuture<'a> {
    Box::pin(async move { Ok(requester.is(EntityType::Ngo, resource_id)) })
}

fn owns_project<'a>(
    requester: &'a Requester,
    project_id: Uuid,
    lookups: &'a dyn OwnershipRepository,
) -> ResolverFuture<'a> {
    Box::pin(async move {
        if requester.entity_type != EntityType::Ngo {
            return Ok(false);
        }
        let owner = lookups.project_owner(project_id).await?;
        Ok(owner.map_or(false, |ngo_id| requester.is(EntityType::Ngo, ngo_id)))
    })
}

fn owns_application<'a>(
    requester: &'a Requester,
    application_id: Uuid,
    lookups: &'a dyn OwnershipRepository,
) -> ResolverFuture<'a> {
    Box::pin(async move {
        let Some(owners) = lookups.application_owners(application_id).await? else {
            return Ok(false);
        };
        let applicant = requester.is(EntityType::User, owners.user_id);
        let project_ngo = owners
            .ngo_id
            .map_or(false, |ngo_id| requester.is(EntityType::Ngo, ngo_id));
        Ok(applicant || project_ngo)
    })
}
