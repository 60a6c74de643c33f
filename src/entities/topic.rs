//! Community board entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Topic {
    pub topic_id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct TopicReply {
    pub reply_id: i64,
    pub topic_id: i64,
    pub author_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Topic row joined with its author's username and reply count
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct TopicSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub topic: Topic,
    pub author_username: String,
    pub reply_count: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct AuthoredReply {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub reply: TopicReply,
    pub author_username: String,
}
