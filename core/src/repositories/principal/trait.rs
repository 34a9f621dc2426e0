//! Principal repository trait over the user and NGO account tables.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::principal::{EntityType, Principal};
use crate::errors::DomainError;

/// Repository trait for principal lookups and account state changes
///
/// Users and NGOs live in separate tables; every call is scoped by
/// [`EntityType`], and ids are only unique within one type.
#[async_trait]
pub trait PrincipalRepository: Send + Sync {
    /// Find a principal by its normalized login email
    async fn find_by_email(
        &self,
        entity_type: EntityType,
        email: &str,
    ) -> Result<Option<Principal>, DomainError>;

    /// Find a principal by id
    async fn find_by_id(
        &self,
        entity_type: EntityType,
        id: Uuid,
    ) -> Result<Option<Principal>, DomainError>;

    /// Create a new principal
    ///
    /// # Returns
    /// * `Ok(Principal)` - The created principal
    /// * `Err(DomainError::Conflict)` - The email is already registered for this type
    async fn create(&self, principal: Principal) -> Result<Principal, DomainError>;

    /// Set the disabled flag
    ///
    /// # Returns
    /// * `Ok(true)` - Principal found and updated
    /// * `Ok(false)` - Principal not found
    async fn set_disabled(
        &self,
        entity_type: EntityType,
        id: Uuid,
        disabled: bool,
    ) -> Result<bool, DomainError>;

    /// Check if an email is already registered for the entity type
    async fn exists_by_email(&self, entity_type: EntityType, email: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_email(entity_type, email).await?.is_some())
    }
}
