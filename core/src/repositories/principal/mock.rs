//! Mock implementation of PrincipalRepository for testing

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::principal::{EntityType, Principal};
use crate::errors::DomainError;

use super::r#trait::PrincipalRepository;

/// Mock principal repository
#[derive(Clone)]
pub struct MockPrincipalRepository {
    principals: Arc<RwLock<HashMap<(EntityType, Uuid), Principal>>>,
    fail: Arc<AtomicBool>,
}

impl MockPrincipalRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            principals: Arc::new(RwLock::new(HashMap::new())),
            fail: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent call fail with an internal error
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Insert a principal directly, bypassing the uniqueness check
    pub async fn insert(&self, principal: Principal) {
        self.principals
            .write()
            .await
            .insert((principal.entity_type, principal.id), principal);
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::internal("principal store unavailable"));
        }
        Ok(())
    }
}

impl Default for MockPrincipalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PrincipalRepository for MockPrincipalRepository {
    async fn find_by_email(
        &self,
        entity_type: EntityType,
        email: &str,
    ) -> Result<Option<Principal>, DomainError> {
        self.check()?;
        let principals = self.principals.read().await;
        Ok(principals
            .values()
            .find(|p| p.entity_type == entity_type && p.login_email == email)
            .cloned())
    }

    async fn find_by_id(
        &self,
        entity_type: EntityType,
        id: Uuid,
    ) -> Result<Option<Principal>, DomainError> {
        self.check()?;
        let principals = self.principals.read().await;
        Ok(principals.get(&(entity_type, id)).cloned())
    }

    async fn create(&self, principal: Principal) -> Result<Principal, DomainError> {
        self.check()?;
        let mut principals = self.principals.write().await;

        let taken = principals
            .values()
            .any(|p| p.entity_type == principal.entity_type && p.login_email == principal.login_email);
        if taken {
            return Err(DomainError::Conflict {
                message: "Email already registered".to_string(),
            });
        }

        principals.insert((principal.entity_type, principal.id), principal.clone());
        Ok(principal)
    }

    async fn set_disabled(
        &self,
        entity_type: EntityType,
        id: Uuid,
        disabled: bool,
    ) -> Result<bool, DomainError> {
        self.check()?;
        let mut principals = self.principals.write().await;

        match principals.get_mut(&(entity_type, id)) {
            Some(principal) => {
                principal.is_disabled = disabled;
                principal.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
