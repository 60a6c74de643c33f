//! Community DTOs - board topics and replies

use crate::entities::{AuthoredReply, TopicSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_CATEGORY: &str = "general";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TopicDTO {
    pub topic_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub reply_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<TopicSummary> for TopicDTO {
    fn from(value: TopicSummary) -> Self {
        let topic = value.topic;
        Self {
            topic_id: topic.topic_id,
            author_id: topic.author_id,
            author_username: value.author_username,
            title: topic.title,
            content: topic.content,
            category: topic.category,
            reply_count: value.reply_count,
            created_at: topic.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReplyDTO {
    pub reply_id: i64,
    pub topic_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<AuthoredReply> for ReplyDTO {
    fn from(value: AuthoredReply) -> Self {
        Self {
            reply_id: value.reply.reply_id,
            topic_id: value.reply.topic_id,
            author_id: value.reply.author_id,
            author_username: value.author_username,
            content: value.reply.content,
            created_at: value.reply.created_at,
        }
    }
}

/// Topic page: the topic and its replies, oldest first
#[derive(Serialize, Deserialize, Debug)]
pub struct TopicDetailDTO {
    pub topic: TopicDTO,
    pub replies: Vec<ReplyDTO>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateTopicRequestDTO {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 20000, message = "Content must be between 1 and 20000 characters"))]
    pub content: String,

    #[validate(length(min = 1, max = 50, message = "Category must be between 1 and 50 characters"))]
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateTopicDTO {
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateReplyRequestDTO {
    #[validate(length(min = 1, max = 5000, message = "Reply must be between 1 and 5000 characters"))]
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct CreateReplyDTO {
    pub topic_id: i64,
    pub author_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
