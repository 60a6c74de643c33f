//! ProfileRepository - public profile fields

use super::{Read, Update};
use crate::dtos::UpdateProfileDTO;
use crate::entities::Profile;
use chrono::Utc;
use sqlx::{Error, SqlitePool};

pub struct ProfileRepository {
    connection_pool: SqlitePool,
}

impl ProfileRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Creates the empty profile that goes with a new account
    pub async fn create_empty(&self, user_id: &i64) -> Result<Profile, Error> {
        let updated_at = Utc::now();
        sqlx::query("INSERT OR IGNORE INTO profiles (user_id, updated_at) VALUES (?, ?)")
            .bind(user_id)
            .bind(updated_at)
            .execute(&self.connection_pool)
            .await?;

        self.read(user_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<Profile, i64> for ProfileRepository {
    async fn read(&self, id: &i64) -> Result<Option<Profile>, Error> {
        sqlx::query_as::<_, Profile>(
            "SELECT user_id, display_name, bio, avatar_url, updated_at FROM profiles WHERE user_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Update<Profile, UpdateProfileDTO, i64> for ProfileRepository {
    async fn update(&self, id: &i64, data: &UpdateProfileDTO) -> Result<Profile, Error> {
        // accounts created before profiles existed get one on first edit
        self.create_empty(id).await?;

        sqlx::query(
            r#"
            UPDATE profiles
            SET display_name = COALESCE(?, display_name),
                bio = COALESCE(?, bio),
                avatar_url = COALESCE(?, avatar_url),
                updated_at = ?
            WHERE user_id = ?
            "#,
        )
        .bind(&data.display_name)
        .bind(&data.bio)
        .bind(&data.avatar_url)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.connection_pool)
        .await?;

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}
