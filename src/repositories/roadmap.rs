//! RoadmapRepository - stored roadmaps

use super::{Create, Delete, Read};
use crate::dtos::CreateRoadmapDTO;
use crate::entities::{RoadmapRecord, RoadmapStep};
use chrono::Utc;
use sqlx::types::Json;
use sqlx::{Error, SqlitePool};

const ROADMAP_COLUMNS: &str =
    "roadmap_id, user_id, topic, experience_level, steps, created_at, updated_at";

pub struct RoadmapRepository {
    connection_pool: SqlitePool,
}

impl RoadmapRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Roadmaps of a user, newest first
    pub async fn find_by_user(&self, user_id: &i64) -> Result<Vec<RoadmapRecord>, Error> {
        let query = format!(
            "SELECT {} FROM roadmaps WHERE user_id = ? ORDER BY created_at DESC, roadmap_id DESC",
            ROADMAP_COLUMNS
        );
        sqlx::query_as::<_, RoadmapRecord>(&query)
            .bind(user_id)
            .fetch_all(&self.connection_pool)
            .await
    }

    /// Overwrites the steps document
    pub async fn update_steps(
        &self,
        roadmap_id: &i64,
        steps: &[RoadmapStep],
    ) -> Result<RoadmapRecord, Error> {
        let result = sqlx::query("UPDATE roadmaps SET steps = ?, updated_at = ? WHERE roadmap_id = ?")
            .bind(Json(steps))
            .bind(Utc::now())
            .bind(roadmap_id)
            .execute(&self.connection_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }
        self.read(roadmap_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Create<RoadmapRecord, CreateRoadmapDTO> for RoadmapRepository {
    async fn create(&self, data: &CreateRoadmapDTO) -> Result<RoadmapRecord, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO roadmaps (user_id, topic, experience_level, steps, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.user_id)
        .bind(&data.topic)
        .bind(data.experience_level)
        .bind(Json(&data.steps))
        .bind(data.created_at)
        .bind(data.created_at)
        .execute(&self.connection_pool)
        .await?;

        Ok(RoadmapRecord {
            roadmap_id: result.last_insert_rowid(),
            user_id: data.user_id,
            topic: data.topic.clone(),
            experience_level: data.experience_level,
            steps: Json(data.steps.clone()),
            created_at: data.created_at,
            updated_at: data.created_at,
        })
    }
}

impl Read<RoadmapRecord, i64> for RoadmapRepository {
    async fn read(&self, id: &i64) -> Result<Option<RoadmapRecord>, Error> {
        let query = format!("SELECT {} FROM roadmaps WHERE roadmap_id = ?", ROADMAP_COLUMNS);
        sqlx::query_as::<_, RoadmapRecord>(&query)
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Delete<i64> for RoadmapRepository {
    async fn delete(&self, id: &i64) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM roadmaps WHERE roadmap_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
