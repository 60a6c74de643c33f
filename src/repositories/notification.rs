//! NotificationRepository - per-user notifications

use super::{Create, Delete, Read};
use crate::dtos::CreateNotificationDTO;
use crate::entities::Notification;
use chrono::Utc;
use sqlx::{Error, SqlitePool};

const NOTIFICATION_COLUMNS: &str =
    "notification_id, recipient_id, actor_id, kind, blog_id, topic_id, message, is_read, created_at";

pub struct NotificationRepository {
    connection_pool: SqlitePool,
}

impl NotificationRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Newest first, at most `limit` rows
    pub async fn find_for_user(
        &self,
        recipient_id: &i64,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>, Error> {
        let query = format!(
            "SELECT {} FROM notifications WHERE recipient_id = ? AND (? = 0 OR is_read = 0) ORDER BY created_at DESC, notification_id DESC LIMIT ?",
            NOTIFICATION_COLUMNS
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(recipient_id)
            .bind(unread_only)
            .bind(limit)
            .fetch_all(&self.connection_pool)
            .await
    }

    pub async fn count_unread(&self, recipient_id: &i64) -> Result<i64, Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = ? AND is_read = 0",
        )
        .bind(recipient_id)
        .fetch_one(&self.connection_pool)
        .await
    }

    /// Sets the read flag. Setting it again leaves the row as it was.
    /// Returns None when the notification does not belong to `recipient_id`.
    pub async fn mark_read(
        &self,
        notification_id: &i64,
        recipient_id: &i64,
    ) -> Result<Option<Notification>, Error> {
        sqlx::query("UPDATE notifications SET is_read = 1 WHERE notification_id = ? AND recipient_id = ?")
            .bind(notification_id)
            .bind(recipient_id)
            .execute(&self.connection_pool)
            .await?;

        Ok(self
            .read(notification_id)
            .await?
            .filter(|n| n.recipient_id == *recipient_id))
    }

    /// Returns how many rows changed from unread to read
    pub async fn mark_all_read(&self, recipient_id: &i64) -> Result<u64, Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = 1 WHERE recipient_id = ? AND is_read = 0",
        )
        .bind(recipient_id)
        .execute(&self.connection_pool)
        .await?;

        Ok(result.rows_affected())
    }
}

impl Create<Notification, CreateNotificationDTO> for NotificationRepository {
    async fn create(&self, data: &CreateNotificationDTO) -> Result<Notification, Error> {
        let created_at = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO notifications (recipient_id, actor_id, kind, blog_id, topic_id, message, is_read, created_at)
            VALUES (?, ?, ?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(data.recipient_id)
        .bind(data.actor_id)
        .bind(data.kind)
        .bind(data.blog_id)
        .bind(data.topic_id)
        .bind(&data.message)
        .bind(created_at)
        .execute(&self.connection_pool)
        .await?;

        Ok(Notification {
            notification_id: result.last_insert_rowid(),
            recipient_id: data.recipient_id,
            actor_id: data.actor_id,
            kind: data.kind,
            blog_id: data.blog_id,
            topic_id: data.topic_id,
            message: data.message.clone(),
            is_read: false,
            created_at,
        })
    }
}

impl Read<Notification, i64> for NotificationRepository {
    async fn read(&self, id: &i64) -> Result<Option<Notification>, Error> {
        let query = format!(
            "SELECT {} FROM notifications WHERE notification_id = ?",
            NOTIFICATION_COLUMNS
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Delete<i64> for NotificationRepository {
    async fn delete(&self, id: &i64) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE notification_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
