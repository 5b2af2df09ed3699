//! In-memory implementation of CredentialStore

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::identity::Identity;
use crate::domain::entities::token::RefreshCredential;
use crate::errors::StorageError;

use super::r#trait::CredentialStore;

#[derive(Default)]
struct Inner {
    credentials: HashMap<Uuid, RefreshCredential>,
    by_hash: HashMap<String, Uuid>,
}

/// Credential store kept in process memory.
///
/// Every mutation runs under a single write lock, which makes `rotate`
/// atomic. Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct InMemoryCredentialStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryCredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored credentials in any state
    pub async fn len(&self) -> usize {
        self.inner.read().await.credentials.len()
    }

    /// Whether the store holds no credentials
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.credentials.is_empty()
    }

    /// Fetch a credential by id
    pub async fn get(&self, id: Uuid) -> Option<RefreshCredential> {
        self.inner.read().await.credentials.get(&id).cloned()
    }
}

impl Inner {
    fn insert(&mut self, credential: RefreshCredential) -> Result<Uuid, StorageError> {
        if self.by_hash.contains_key(&credential.token_hash) {
            return Err(StorageError::DuplicateHash);
        }
        let id = credential.id;
        self.by_hash.insert(credential.token_hash.clone(), id);
        self.credentials.insert(id, credential);
        Ok(id)
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn save(&self, credential: RefreshCredential) -> Result<Uuid, StorageError> {
        self.inner.write().await.insert(credential)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshCredential>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_hash
            .get(token_hash)
            .and_then(|id| inner.credentials.get(id))
            .cloned())
    }

    async fn revoke(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, StorageError> {
        let mut inner = self.inner.write().await;
        let credential = inner.credentials.get_mut(&id).ok_or(StorageError::NotFound)?;
        Ok(credential.revoke(at))
    }

    async fn rotate(
        &self,
        old_id: Uuid,
        successor: RefreshCredential,
        at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let mut inner = self.inner.write().await;

        if !inner.credentials.get(&old_id).is_some_and(|old| old.is_usable_at(at)) {
            return Ok(false);
        }
        // Insert first so a hash collision leaves the old credential untouched
        inner.insert(successor)?;
        if let Some(old) = inner.credentials.get_mut(&old_id) {
            old.revoke(at);
        }
        Ok(true)
    }

    async fn revoke_all_for_identity(&self, identity: &Identity, at: DateTime<Utc>) -> Result<u64, StorageError> {
        let mut inner = self.inner.write().await;
        let revoked = inner
            .credentials
            .values_mut()
            .filter(|c| &c.identity == identity)
            .map(|c| c.revoke(at))
            .filter(|newly_revoked| *newly_revoked)
            .count();
        Ok(revoked as u64)
    }

    async fn find_active_by_identity(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshCredential>, StorageError> {
        let inner = self.inner.read().await;
        let mut active: Vec<RefreshCredential> = inner
            .credentials
            .values()
            .filter(|c| &c.identity == identity && c.is_usable_at(now))
            .cloned()
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }
}
