//! CommentRepository - comments under blogs

use super::{Create, Delete, Read};
use crate::dtos::CreateCommentDTO;
use crate::entities::{AuthoredComment, Comment};
use sqlx::{Error, SqlitePool};

pub struct CommentRepository {
    connection_pool: SqlitePool,
}

impl CommentRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Comments of a blog, oldest first
    pub async fn find_by_blog(&self, blog_id: &i64) -> Result<Vec<AuthoredComment>, Error> {
        sqlx::query_as::<_, AuthoredComment>(
            r#"
            SELECT c.comment_id, c.blog_id, c.author_id, c.content, c.created_at,
                   u.username AS author_username
            FROM comments c
            JOIN users u ON u.user_id = c.author_id
            WHERE c.blog_id = ?
            ORDER BY c.created_at ASC, c.comment_id ASC
            "#,
        )
        .bind(blog_id)
        .fetch_all(&self.connection_pool)
        .await
    }
}

impl Create<Comment, CreateCommentDTO> for CommentRepository {
    async fn create(&self, data: &CreateCommentDTO) -> Result<Comment, Error> {
        let result = sqlx::query(
            "INSERT INTO comments (blog_id, author_id, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(data.blog_id)
        .bind(data.author_id)
        .bind(&data.content)
        .bind(data.created_at)
        .execute(&self.connection_pool)
        .await?;

        Ok(Comment {
            comment_id: result.last_insert_rowid(),
            blog_id: data.blog_id,
            author_id: data.author_id,
            content: data.content.clone(),
            created_at: data.created_at,
        })
    }
}

impl Read<Comment, i64> for CommentRepository {
    async fn read(&self, id: &i64) -> Result<Option<Comment>, Error> {
        sqlx::query_as::<_, Comment>(
            "SELECT comment_id, blog_id, author_id, content, created_at FROM comments WHERE comment_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Delete<i64> for CommentRepository {
    async fn delete(&self, id: &i64) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM comments WHERE comment_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
