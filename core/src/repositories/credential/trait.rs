//! Credential store trait defining the persistence contract for refresh credentials.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::identity::Identity;
use crate::domain::entities::token::RefreshCredential;
use crate::errors::StorageError;

/// Durable record of issued refresh credentials
///
/// Credentials are keyed by the digest of the opaque refresh token; the
/// plaintext never reaches the store.
///
/// # Consistency
/// `rotate` must be atomic: of several concurrent calls for the same
/// credential exactly one may observe `Ok(true)`.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persist a new credential
    ///
    /// # Returns
    /// * `Ok(Uuid)` - The id of the stored credential
    /// * `Err(StorageError::DuplicateHash)` - Another credential already has this hash
    /// * `Err(StorageError)` - Store failure
    ///
    /// # Example
    /// ```no_run
    /// # use chrono::{Duration, Utc};
    /// # use ts_core::domain::entities::{Identity, RefreshCredential};
    /// # use ts_core::repositories::CredentialStore;
    /// # async fn example(store: &impl CredentialStore) -> Result<(), Box<dyn std::error::Error>> {
    /// let identity = Identity::new("user-42")?;
    /// let credential = RefreshCredential::new(identity, "sha256-hex".to_string(), Utc::now(), Duration::days(2));
    ///
    /// let id = store.save(credential).await?;
    /// println!("stored credential {}", id);
    /// # Ok(())
    /// # }
    /// ```
    async fn save(&self, credential: RefreshCredential) -> Result<Uuid, StorageError>;

    /// Find a credential by exact token hash
    ///
    /// # Returns
    /// * `Ok(Some(RefreshCredential))` - Found, in whatever state it is in
    /// * `Ok(None)` - No credential with this hash
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshCredential>, StorageError>;

    /// Revoke a credential by id
    ///
    /// Idempotent: revoking an already revoked credential succeeds and keeps
    /// the original `revoked_at`. Of several concurrent calls for the same
    /// credential exactly one observes `Ok(true)`.
    ///
    /// # Returns
    /// * `Ok(true)` - This call set `revoked_at`
    /// * `Ok(false)` - The credential was already revoked
    /// * `Err(StorageError::NotFound)` - Unknown id
    async fn revoke(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, StorageError>;

    /// Redeem `old_id` and persist its successor as one atomic unit
    ///
    /// The old credential is revoked only if it is still unrevoked and
    /// unexpired at `at`; the successor is inserted only if that conditional
    /// revoke took effect.
    ///
    /// # Returns
    /// * `Ok(true)` - Old credential revoked and successor stored
    /// * `Ok(false)` - Old credential was no longer active; nothing written
    async fn rotate(
        &self,
        old_id: Uuid,
        successor: RefreshCredential,
        at: DateTime<Utc>,
    ) -> Result<bool, StorageError>;

    /// Revoke every unrevoked credential of an identity
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of credentials newly revoked
    async fn revoke_all_for_identity(&self, identity: &Identity, at: DateTime<Utc>) -> Result<u64, StorageError>;

    /// List usable credentials of an identity, newest first
    async fn find_active_by_identity(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshCredential>, StorageError>;

    /// Count usable credentials of an identity
    async fn count_active(&self, identity: &Identity, now: DateTime<Utc>) -> Result<usize, StorageError> {
        Ok(self.find_active_by_identity(identity, now).await?.len())
    }
}
