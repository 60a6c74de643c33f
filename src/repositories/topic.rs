//! TopicRepository - community board topics and replies

use super::{Create, Delete, Read};
use crate::dtos::{CreateReplyDTO, CreateTopicDTO};
use crate::entities::{AuthoredReply, Topic, TopicReply, TopicSummary};
use sqlx::{Error, SqlitePool};

const TOPIC_SUMMARY_SELECT: &str = r#"
    SELECT
        t.topic_id, t.author_id, t.title, t.content, t.category, t.created_at,
        u.username AS author_username,
        (SELECT COUNT(*) FROM topic_replies r WHERE r.topic_id = t.topic_id) AS reply_count
    FROM topics t
    JOIN users u ON u.user_id = t.author_id
"#;

pub struct TopicRepository {
    connection_pool: SqlitePool,
}

impl TopicRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Newest first, optionally restricted to one category
    pub async fn find_summaries(&self, category: Option<&str>) -> Result<Vec<TopicSummary>, Error> {
        let query = format!(
            "{} WHERE (?1 IS NULL OR t.category = ?1) ORDER BY t.created_at DESC, t.topic_id DESC",
            TOPIC_SUMMARY_SELECT
        );
        sqlx::query_as::<_, TopicSummary>(&query)
            .bind(category)
            .fetch_all(&self.connection_pool)
            .await
    }

    pub async fn find_summary(&self, topic_id: &i64) -> Result<Option<TopicSummary>, Error> {
        let query = format!("{} WHERE t.topic_id = ?", TOPIC_SUMMARY_SELECT);
        sqlx::query_as::<_, TopicSummary>(&query)
            .bind(topic_id)
            .fetch_optional(&self.connection_pool)
            .await
    }

    pub async fn create_reply(&self, data: &CreateReplyDTO) -> Result<TopicReply, Error> {
        let result = sqlx::query(
            "INSERT INTO topic_replies (topic_id, author_id, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(data.topic_id)
        .bind(data.author_id)
        .bind(&data.content)
        .bind(data.created_at)
        .execute(&self.connection_pool)
        .await?;

        Ok(TopicReply {
            reply_id: result.last_insert_rowid(),
            topic_id: data.topic_id,
            author_id: data.author_id,
            content: data.content.clone(),
            created_at: data.created_at,
        })
    }

    /// Replies of a topic, oldest first
    pub async fn find_replies(&self, topic_id: &i64) -> Result<Vec<AuthoredReply>, Error> {
        sqlx::query_as::<_, AuthoredReply>(
            r#"
            SELECT r.reply_id, r.topic_id, r.author_id, r.content, r.created_at,
                   u.username AS author_username
            FROM topic_replies r
            JOIN users u ON u.user_id = r.author_id
            WHERE r.topic_id = ?
            ORDER BY r.created_at ASC, r.reply_id ASC
            "#,
        )
        .bind(topic_id)
        .fetch_all(&self.connection_pool)
        .await
    }
}

impl Create<Topic, CreateTopicDTO> for TopicRepository {
    async fn create(&self, data: &CreateTopicDTO) -> Result<Topic, Error> {
        let result = sqlx::query(
            "INSERT INTO topics (author_id, title, content, category, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(data.author_id)
        .bind(&data.title)
        .bind(&data.content)
        .bind(&data.category)
        .bind(data.created_at)
        .execute(&self.connection_pool)
        .await?;

        Ok(Topic {
            topic_id: result.last_insert_rowid(),
            author_id: data.author_id,
            title: data.title.clone(),
            content: data.content.clone(),
            category: data.category.clone(),
            created_at: data.created_at,
        })
    }
}

impl Read<Topic, i64> for TopicRepository {
    async fn read(&self, id: &i64) -> Result<Option<Topic>, Error> {
        sqlx::query_as::<_, Topic>(
            "SELECT topic_id, author_id, title, content, category, created_at FROM topics WHERE topic_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Delete<i64> for TopicRepository {
    async fn delete(&self, id: &i64) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM topics WHERE topic_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
