//! Ownership lookups for resources that belong to a principal.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::value_objects::ownership::ApplicationOwners;
use crate::errors::DomainError;

/// Read-only queries resolving who owns a project or an application
#[async_trait]
pub trait OwnershipRepository: Send + Sync {
    /// NGO that owns the project, `None` when the project does not exist
    async fn project_owner(&self, project_id: Uuid) -> Result<Option<Uuid>, DomainError>;

    /// Applicant and project-owning NGO of an application, `None` when the
    /// application does not exist
    async fn application_owners(
        &self,
        application_id: Uuid,
    ) -> Result<Option<ApplicationOwners>, DomainError>;
}
