//! UserRepository - accounts and credentials

use super::{Create, Delete, Read, escape_like};
use crate::dtos::CreateUserDTO;
use crate::entities::User;
use chrono::Utc;
use sqlx::{Error, SqlitePool};

pub struct UserRepository {
    connection_pool: SqlitePool,
}

impl UserRepository {
    pub fn new(connection_pool: SqlitePool) -> UserRepository {
        Self { connection_pool }
    }

    /// Find user by exact username match (usernames are unique)
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(
            "SELECT user_id, username, email, password, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.connection_pool)
        .await
    }

    /// Search users by username prefix, at most 10 results
    pub async fn search_by_username_prefix(&self, prefix: &str) -> Result<Vec<User>, Error> {
        let pattern = format!("{}%", escape_like(prefix));
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, username, email, password, created_at
            FROM users
            WHERE username LIKE ? ESCAPE '\'
            ORDER BY username ASC
            LIMIT 10
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Replaces the stored hash; `password_hash` must already be hashed
    pub async fn update_password(&self, user_id: &i64, password_hash: &str) -> Result<(), Error> {
        let result = sqlx::query("UPDATE users SET password = ? WHERE user_id = ?")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.connection_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }
        Ok(())
    }
}

impl Create<User, CreateUserDTO> for UserRepository {
    /// `data.password` is expected to be the bcrypt hash
    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO users (username, email, password, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.password)
        .bind(created_at)
        .execute(&self.connection_pool)
        .await?;

        Ok(User {
            user_id: result.last_insert_rowid(),
            username: data.username.clone(),
            email: data.email.clone(),
            password: data.password.clone(),
            created_at,
        })
    }
}

impl Read<User, i64> for UserRepository {
    async fn read(&self, id: &i64) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(
            "SELECT user_id, username, email, password, created_at FROM users WHERE user_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Delete<i64> for UserRepository {
    /// Hard delete, owned rows go away through ON DELETE CASCADE
    async fn delete(&self, user_id: &i64) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.connection_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
