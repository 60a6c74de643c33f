//! BlogRepository - blog posts

use super::{Create, Delete, Read, Update, escape_like};
use crate::dtos::{CreateBlogDTO, UpdateBlogDTO};
use crate::entities::{AuthoredBlog, Blog};
use chrono::Utc;
use sqlx::{Error, SqlitePool};

const AUTHORED_BLOG_SELECT: &str = r#"
    SELECT
        b.blog_id, b.author_id, b.title, b.content, b.cover_image_url,
        b.published, b.created_at, b.updated_at,
        u.username AS author_username,
        (SELECT COUNT(*) FROM comments c WHERE c.blog_id = b.blog_id) AS comment_count
    FROM blogs b
    JOIN users u ON u.user_id = b.author_id
"#;

pub struct BlogRepository {
    connection_pool: SqlitePool,
}

impl BlogRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Published blogs, newest first, with optional title search and author filter
    pub async fn find_published(
        &self,
        search: Option<&str>,
        author_id: Option<i64>,
    ) -> Result<Vec<AuthoredBlog>, Error> {
        // LIKE is case-insensitive for ASCII in SQLite
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));

        let query = format!(
            "{} WHERE b.published = 1 AND (?1 IS NULL OR b.title LIKE ?1 ESCAPE '\\') AND (?2 IS NULL OR b.author_id = ?2) ORDER BY b.created_at DESC, b.blog_id DESC",
            AUTHORED_BLOG_SELECT
        );
        sqlx::query_as::<_, AuthoredBlog>(&query)
            .bind(pattern)
            .bind(author_id)
            .fetch_all(&self.connection_pool)
            .await
    }

    /// Published blogs written by authors that `user_id` follows
    pub async fn find_feed(&self, user_id: &i64) -> Result<Vec<AuthoredBlog>, Error> {
        let query = format!(
            "{} WHERE b.published = 1 AND b.author_id IN (SELECT following_id FROM follows WHERE follower_id = ?) ORDER BY b.created_at DESC, b.blog_id DESC",
            AUTHORED_BLOG_SELECT
        );
        sqlx::query_as::<_, AuthoredBlog>(&query)
            .bind(user_id)
            .fetch_all(&self.connection_pool)
            .await
    }

    /// Every blog of an author, drafts included
    pub async fn find_by_author(&self, author_id: &i64) -> Result<Vec<AuthoredBlog>, Error> {
        let query = format!(
            "{} WHERE b.author_id = ? ORDER BY b.created_at DESC, b.blog_id DESC",
            AUTHORED_BLOG_SELECT
        );
        sqlx::query_as::<_, AuthoredBlog>(&query)
            .bind(author_id)
            .fetch_all(&self.connection_pool)
            .await
    }

    /// Marks the blog as announced to followers. Returns false when it
    /// already was, so a blog is announced at most once.
    pub async fn claim_announcement(&self, blog_id: &i64) -> Result<bool, Error> {
        let result = sqlx::query(
            "UPDATE blogs SET announced_at = ? WHERE blog_id = ? AND announced_at IS NULL",
        )
        .bind(Utc::now())
        .bind(blog_id)
        .execute(&self.connection_pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn find_authored(&self, blog_id: &i64) -> Result<Option<AuthoredBlog>, Error> {
        let query = format!("{} WHERE b.blog_id = ?", AUTHORED_BLOG_SELECT);
        sqlx::query_as::<_, AuthoredBlog>(&query)
            .bind(blog_id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Create<Blog, CreateBlogDTO> for BlogRepository {
    async fn create(&self, data: &CreateBlogDTO) -> Result<Blog, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO blogs (author_id, title, content, cover_image_url, published, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.author_id)
        .bind(&data.title)
        .bind(&data.content)
        .bind(&data.cover_image_url)
        .bind(data.published)
        .bind(data.created_at)
        .bind(data.created_at)
        .execute(&self.connection_pool)
        .await?;

        Ok(Blog {
            blog_id: result.last_insert_rowid(),
            author_id: data.author_id,
            title: data.title.clone(),
            content: data.content.clone(),
            cover_image_url: data.cover_image_url.clone(),
            published: data.published,
            created_at: data.created_at,
            updated_at: data.created_at,
        })
    }
}

impl Read<Blog, i64> for BlogRepository {
    async fn read(&self, id: &i64) -> Result<Option<Blog>, Error> {
        sqlx::query_as::<_, Blog>(
            r#"
            SELECT blog_id, author_id, title, content, cover_image_url, published, created_at, updated_at
            FROM blogs
            WHERE blog_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Update<Blog, UpdateBlogDTO, i64> for BlogRepository {
    async fn update(&self, id: &i64, data: &UpdateBlogDTO) -> Result<Blog, Error> {
        let result = sqlx::query(
            r#"
            UPDATE blogs
            SET title = COALESCE(?, title),
                content = COALESCE(?, content),
                cover_image_url = COALESCE(?, cover_image_url),
                published = COALESCE(?, published),
                updated_at = ?
            WHERE blog_id = ?
            "#,
        )
        .bind(&data.title)
        .bind(&data.content)
        .bind(&data.cover_image_url)
        .bind(data.published)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.connection_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i64> for BlogRepository {
    async fn delete(&self, id: &i64) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM blogs WHERE blog_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
