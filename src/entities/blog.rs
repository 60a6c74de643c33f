//! Blog and comment entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Blog {
    pub blog_id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub cover_image_url: Option<String>,
    // drafts are visible to their author only
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub comment_id: i64,
    pub blog_id: i64,
    pub author_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Blog row joined with its author's username and comment count
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct AuthoredBlog {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub blog: Blog,
    pub author_username: String,
    pub comment_count: i64,
}

/// Comment row joined with its author's username
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct AuthoredComment {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub comment: Comment,
    pub author_username: String,
}
