//! LearningProfileRepository - wizard answers, one row per user

use super::Read;
use crate::dtos::UpsertLearningProfileDTO;
use crate::entities::LearningProfile;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::{Error, SqlitePool};

pub struct LearningProfileRepository {
    connection_pool: SqlitePool,
}

impl LearningProfileRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Inserts or replaces the profile of `user_id`
    pub async fn upsert(
        &self,
        user_id: &i64,
        data: &UpsertLearningProfileDTO,
    ) -> Result<LearningProfile, Error> {
        let interests: Vec<String> = data
            .interests
            .iter()
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .collect();

        sqlx::query(
            r#"
            INSERT INTO learning_profiles (user_id, experience_level, interests, goals, weekly_hours, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                experience_level = excluded.experience_level,
                interests = excluded.interests,
                goals = excluded.goals,
                weekly_hours = excluded.weekly_hours,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(data.experience_level)
        .bind(Json(&interests))
        .bind(&data.goals)
        .bind(data.weekly_hours)
        .bind(Utc::now())
        .execute(&self.connection_pool)
        .await?;

        self.read(user_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<LearningProfile, i64> for LearningProfileRepository {
    async fn read(&self, id: &i64) -> Result<Option<LearningProfile>, Error> {
        sqlx::query_as::<_, LearningProfile>(
            r#"
            SELECT user_id, experience_level, interests, goals, weekly_hours, updated_at
            FROM learning_profiles
            WHERE user_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}
