//! SQLite session store implementation.
//!
//! Implements `KvStore` from `hireloop-core` with split read/write pools.
//! Values are stored as JSON text and parsed on read.

use chrono::Utc;
use hireloop_core::storage::kv_store::KvStore;
use hireloop_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `KvStore`.
pub struct SqliteKvStore {
    pool: DatabasePool,
}

impl SqliteKvStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl KvStore for SqliteKvStore {
    async fn get(
        &self,
        namespace: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, RepositoryError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE namespace = ? AND key = ?")
            .bind(namespace)
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let value_str: String = row
                    .try_get("value")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                let value = serde_json::from_str(&value_str)
                    .map_err(|e| RepositoryError::Query(format!("invalid JSON value: {e}")))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        namespace: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let value_str = serde_json::to_string(value)
            .map_err(|e| RepositoryError::Query(format!("failed to serialize value: {e}")))?;

        sqlx::query(
            r#"INSERT INTO kv_store (namespace, key, value, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT (namespace, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(namespace)
        .bind(key)
        .bind(&value_str)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, namespace: &str, key: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM kv_store WHERE namespace = ? AND key = ?")
            .bind(namespace)
            .bind(key)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}
