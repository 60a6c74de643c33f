//! Blog DTOs - posts and comments

use crate::entities::{AuthoredBlog, AuthoredComment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BlogDTO {
    pub blog_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub title: String,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub published: bool,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AuthoredBlog> for BlogDTO {
    fn from(value: AuthoredBlog) -> Self {
        let blog = value.blog;
        Self {
            blog_id: blog.blog_id,
            author_id: blog.author_id,
            author_username: value.author_username,
            title: blog.title,
            content: blog.content,
            cover_image_url: blog.cover_image_url,
            published: blog.published,
            comment_count: value.comment_count,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        }
    }
}

/// Body of POST /blogs
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateBlogRequestDTO {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 50000, message = "Content must be between 1 and 50000 characters"))]
    pub content: String,

    #[validate(length(max = 500))]
    #[serde(default)]
    pub cover_image_url: Option<String>,

    #[serde(default)]
    pub published: bool,
}

/// DTO to create a blog row (without blog_id)
#[derive(Debug, Clone)]
pub struct CreateBlogDTO {
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

/// Partial update, only `Some` fields change
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateBlogDTO {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 50000, message = "Content must be between 1 and 50000 characters"))]
    pub content: Option<String>,

    #[validate(length(max = 500))]
    pub cover_image_url: Option<String>,

    pub published: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CommentDTO {
    pub comment_id: i64,
    pub blog_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<AuthoredComment> for CommentDTO {
    fn from(value: AuthoredComment) -> Self {
        Self {
            comment_id: value.comment.comment_id,
            blog_id: value.comment.blog_id,
            author_id: value.comment.author_id,
            author_username: value.author_username,
            content: value.comment.content,
            created_at: value.comment.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateCommentRequestDTO {
    #[validate(length(min = 1, max = 5000, message = "Comment must be between 1 and 5000 characters"))]
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct CreateCommentDTO {
    pub blog_id: i64,
    pub author_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
