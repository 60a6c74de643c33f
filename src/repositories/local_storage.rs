//! LocalStorageRepository - per-user key/value blobs
//!
//! Values are opaque text (JSON documents in practice). Reads and writes
//! are whole-value, the last write wins.

use chrono::Utc;
use sqlx::{Error, SqlitePool};

pub struct LocalStorageRepository {
    connection_pool: SqlitePool,
}

impl LocalStorageRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    pub async fn get_item(&self, user_id: &i64, key: &str) -> Result<Option<String>, Error> {
        sqlx::query_scalar("SELECT value FROM local_storage WHERE user_id = ? AND storage_key = ?")
            .bind(user_id)
            .bind(key)
            .fetch_optional(&self.connection_pool)
            .await
    }

    pub async fn set_item(&self, user_id: &i64, key: &str, value: &str) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO local_storage (user_id, storage_key, value, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id, storage_key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.connection_pool)
        .await?;

        Ok(())
    }

    /// Returns false when the key was not set
    pub async fn remove_item(&self, user_id: &i64, key: &str) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM local_storage WHERE user_id = ? AND storage_key = ?")
            .bind(user_id)
            .bind(key)
            .execute(&self.connection_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
