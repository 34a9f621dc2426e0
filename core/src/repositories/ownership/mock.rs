//! Mock implementation of OwnershipRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::value_objects::ownership::ApplicationOwners;
use crate::errors::DomainError;

use super::r#trait::OwnershipRepository;

/// In-memory projects and applications with injectable failures and latency
#[derive(Clone, Default)]
pub struct MockOwnershipRepository {
    projects: Arc<RwLock<HashMap<Uuid, Uuid>>>,
    applications: Arc<RwLock<HashMap<Uuid, (Uuid, Uuid)>>>,
    fail: Arc<AtomicBool>,
    delay_ms: Arc<AtomicU64>,
}

impl MockOwnershipRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project owned by `ngo_id`
    pub async fn add_project(&self, project_id: Uuid, ngo_id: Uuid) {
        self.projects.write().await.insert(project_id, ngo_id);
    }

    /// Register an application of `user_id` to `project_id`
    pub async fn add_application(&self, application_id: Uuid, user_id: Uuid, project_id: Uuid) {
        self.applications
            .write()
            .await
            .insert(application_id, (user_id, project_id));
    }

    pub async fn remove_project(&self, project_id: Uuid) {
        self.projects.write().await.remove(&project_id);
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Delay every lookup, to exercise lookup timeouts
    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    async fn before_lookup(&self) -> Result<(), DomainError> {
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::internal("ownership store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl OwnershipRepository for MockOwnershipRepository {
    async fn project_owner(&self, project_id: Uuid) -> Result<Option<Uuid>, DomainError> {
        self.before_lookup().await?;
        Ok(self.projects.read().await.get(&project_id).copied())
    }

    async fn application_owners(
        &self,
        application_id: Uuid,
    ) -> Result<Option<ApplicationOwners>, DomainError> {
        self.before_lookup().await?;
        let Some((user_id, project_id)) = self.applications.read().await.get(&application_id).copied()
        else {
            return Ok(None);
        };
        let ngo_id = self.projects.read().await.get(&project_id).copied();
        Ok(Some(ApplicationOwners { user_id, ngo_id }))
    }
}
