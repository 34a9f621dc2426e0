//! Process-local revoked access token store.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::DomainError;

use super::r#trait::RevokedTokenStore;

/// Revoked token ids held in memory
///
/// Revocations are lost on restart and not shared across instances.
#[derive(Clone, Default)]
pub struct InMemoryRevokedTokenStore {
    ids: Arc<RwLock<HashSet<String>>>,
}

impl InMemoryRevokedTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevokedTokenStore for InMemoryRevokedTokenStore {
    async fn insert(&self, jti: &str) -> Result<(), DomainError> {
        self.ids.write().await.insert(jti.to_string());
        Ok(())
    }

    async fn contains(&self, jti: &str) -> Result<bool, DomainError> {
        Ok(self.ids.read().await.contains(jti))
    }

    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.ids.read().await.len())
    }
}
