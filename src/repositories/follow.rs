//! FollowRepository - follower graph

use crate::entities::{Follow, UserSummary};
use chrono::Utc;
use sqlx::{Error, SqlitePool};

pub struct FollowRepository {
    connection_pool: SqlitePool,
}

impl FollowRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Inserts the edge; a duplicate surfaces as a unique violation
    pub async fn follow(&self, follower_id: &i64, following_id: &i64) -> Result<Follow, Error> {
        let created_at = Utc::now();
        sqlx::query("INSERT INTO follows (follower_id, following_id, created_at) VALUES (?, ?, ?)")
            .bind(follower_id)
            .bind(following_id)
            .bind(created_at)
            .execute(&self.connection_pool)
            .await?;

        Ok(Follow {
            follower_id: *follower_id,
            following_id: *following_id,
            created_at,
        })
    }

    /// Returns false when there was no such edge
    pub async fn unfollow(&self, follower_id: &i64, following_id: &i64) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM follows WHERE follower_id = ? AND following_id = ?")
            .bind(follower_id)
            .bind(following_id)
            .execute(&self.connection_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn is_following(&self, follower_id: &i64, following_id: &i64) -> Result<bool, Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM follows WHERE follower_id = ? AND following_id = ?",
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_one(&self.connection_pool)
        .await?;

        Ok(count > 0)
    }

    pub async fn count_followers(&self, user_id: &i64) -> Result<i64, Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE following_id = ?")
            .bind(user_id)
            .fetch_one(&self.connection_pool)
            .await
    }

    pub async fn count_following(&self, user_id: &i64) -> Result<i64, Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE follower_id = ?")
            .bind(user_id)
            .fetch_one(&self.connection_pool)
            .await
    }

    /// Ids of everyone following `user_id`, used for fan-out notifications
    pub async fn follower_ids(&self, user_id: &i64) -> Result<Vec<i64>, Error> {
        sqlx::query_scalar("SELECT follower_id FROM follows WHERE following_id = ?")
            .bind(user_id)
            .fetch_all(&self.connection_pool)
            .await
    }

    pub async fn followers_of(&self, user_id: &i64) -> Result<Vec<UserSummary>, Error> {
        sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.user_id, u.username, p.display_name, p.avatar_url
            FROM follows f
            JOIN users u ON u.user_id = f.follower_id
            LEFT JOIN profiles p ON p.user_id = u.user_id
            WHERE f.following_id = ?
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn following_of(&self, user_id: &i64) -> Result<Vec<UserSummary>, Error> {
        sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.user_id, u.username, p.display_name, p.avatar_url
            FROM follows f
            JOIN users u ON u.user_id = f.following_id
            LEFT JOIN profiles p ON p.user_id = u.user_id
            WHERE f.follower_id = ?
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await
    }
}
