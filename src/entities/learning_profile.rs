//! Learning profile entity - answers of the roadmap wizard

use super::enums::ExperienceLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct LearningProfile {
    pub user_id: i64,
    pub experience_level: ExperienceLevel,
    pub interests: Json<Vec<String>>,
    pub goals: Option<String>,
    pub weekly_hours: Option<i64>,
    pub updated_at: DateTime<Utc>,
}
