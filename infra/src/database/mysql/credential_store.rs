//! MySQL implementation of the CredentialStore trait.
//!
//! Refresh credentials live in `refresh_credentials`, keyed by the SHA-256
//! digest of the opaque token. Rotation runs inside a transaction around a
//! conditional `UPDATE`, so concurrent rotations of one token serialize on
//! the row lock and only the first one sees an affected row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{Executor, MySql, MySqlPool, Row};
use uuid::Uuid;

use ts_core::domain::entities::{Identity, RefreshCredential};
use ts_core::errors::StorageError;
use ts_core::repositories::CredentialStore;

const SELECT_COLUMNS: &str = r#"
    SELECT id, identity, token_hash, created_at, updated_at, expires_at,
           revoked_at, created_from_ip, user_agent
    FROM refresh_credentials
"#;

/// MySQL implementation of CredentialStore
#[derive(Clone)]
pub struct MySqlCredentialStore {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlCredentialStore {
    /// Create a new MySQL credential store
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to RefreshCredential entity
    fn row_to_credential(row: &MySqlRow) -> Result<RefreshCredential, StorageError> {
        let id: String = row.try_get("id").map_err(corrupted)?;
        let identity: String = row.try_get("identity").map_err(corrupted)?;

        Ok(RefreshCredential {
            id: Uuid::parse_str(&id)
                .map_err(|e| StorageError::Corrupted(format!("invalid credential id: {}", e)))?,
            identity: Identity::new(identity)
                .map_err(|e| StorageError::Corrupted(e.to_string()))?,
            token_hash: row.try_get("token_hash").map_err(corrupted)?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(corrupted)?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at").map_err(corrupted)?,
            expires_at: row.try_get::<DateTime<Utc>, _>("expires_at").map_err(corrupted)?,
            revoked_at: row.try_get::<Option<DateTime<Utc>>, _>("revoked_at").map_err(corrupted)?,
            created_from_ip: row.try_get("created_from_ip").map_err(corrupted)?,
            user_agent: row.try_get("user_agent").map_err(corrupted)?,
        })
    }

    async fn insert<'e, E>(executor: E, credential: &RefreshCredential) -> Result<(), StorageError>
    where
        E: Executor<'e, Database = MySql>,
    {
        let query = r#"
            INSERT INTO refresh_credentials (
                id, identity, token_hash, created_at, updated_at, expires_at,
                revoked_at, created_from_ip, user_agent
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(credential.id.to_string())
            .bind(credential.identity.as_str())
            .bind(&credential.token_hash)
            .bind(credential.created_at)
            .bind(credential.updated_at)
            .bind(credential.expires_at)
            .bind(credential.revoked_at)
            .bind(credential.created_from_ip.as_deref())
            .bind(credential.user_agent.as_deref())
            .execute(executor)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MySqlCredentialStore {
    async fn save(&self, credential: RefreshCredential) -> Result<Uuid, StorageError> {
        Self::insert(&self.pool, &credential).await?;
        Ok(credential.id)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshCredential>, StorageError> {
        let query = format!("{} WHERE token_hash = ? LIMIT 1", SELECT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(Self::row_to_credential).transpose()
    }

    async fn revoke(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, StorageError> {
        let query = r#"
            UPDATE refresh_credentials
            SET revoked_at = ?, updated_at = ?
            WHERE id = ? AND revoked_at IS NULL
        "#;

        let result = sqlx::query(query)
            .bind(at)
            .bind(at)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // Nothing updated: either already revoked or unknown
        let exists: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM refresh_credentials WHERE id = ?)")
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if exists > 0 {
            Ok(false)
        } else {
            Err(StorageError::NotFound)
        }
    }

    async fn rotate(
        &self,
        old_id: Uuid,
        successor: RefreshCredential,
        at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let query = r#"
            UPDATE refresh_credentials
            SET revoked_at = ?, updated_at = ?
            WHERE id = ? AND revoked_at IS NULL AND expires_at > ?
        "#;

        let result = sqlx::query(query)
            .bind(at)
            .bind(at)
            .bind(old_id.to_string())
            .bind(at)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(map_sqlx_error)?;
            return Ok(false);
        }

        // Dropping the transaction on error rolls back the revoke
        Self::insert(&mut *tx, &successor).await?;
        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(true)
    }

    async fn revoke_all_for_identity(&self, identity: &Identity, at: DateTime<Utc>) -> Result<u64, StorageError> {
        let query = r#"
            UPDATE refresh_credentials
            SET revoked_at = ?, updated_at = ?
            WHERE identity = ? AND revoked_at IS NULL
        "#;

        let result = sqlx::query(query)
            .bind(at)
            .bind(at)
            .bind(identity.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn find_active_by_identity(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshCredential>, StorageError> {
        let query = format!(
            "{} WHERE identity = ? AND revoked_at IS NULL AND expires_at > ? ORDER BY created_at DESC",
            SELECT_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(identity.as_str())
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter().map(Self::row_to_credential).collect()
    }
}

fn corrupted(e: sqlx::Error) -> StorageError {
    StorageError::Corrupted(e.to_string())
}

/// Classify SQLx failures into store errors
pub(crate) fn map_sqlx_error(e: sqlx::Error) -> StorageError {
    match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => StorageError::DuplicateHash,
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::WorkerCrashed => {
            tracing::error!(error = %e, "Credential store unavailable");
            StorageError::Unavailable(e.to_string())
        }
        sqlx::Error::RowNotFound => StorageError::NotFound,
        other => {
            tracing::error!(error = %other, "Credential store query failed");
            StorageError::Query(other.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_unavailable() {
        assert!(matches!(map_sqlx_error(sqlx::Error::PoolTimedOut), StorageError::Unavailable(_)));
        assert!(matches!(map_sqlx_error(sqlx::Error::PoolClosed), StorageError::Unavailable(_)));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(matches!(map_sqlx_error(sqlx::Error::RowNotFound), StorageError::NotFound));
    }

    #[test]
    fn test_other_errors_are_query_failures() {
        let error = map_sqlx_error(sqlx::Error::ColumnNotFound("token_hash".to_string()));
        assert!(matches!(error, StorageError::Query(_)));
    }
}
