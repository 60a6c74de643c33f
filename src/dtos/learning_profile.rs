//! Learning profile DTOs

use crate::entities::{ExperienceLevel, LearningProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LearningProfileDTO {
    pub experience_level: ExperienceLevel,
    pub interests: Vec<String>,
    pub goals: Option<String>,
    pub weekly_hours: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

impl From<LearningProfile> for LearningProfileDTO {
    fn from(value: LearningProfile) -> Self {
        Self {
            experience_level: value.experience_level,
            interests: value.interests.0,
            goals: value.goals,
            weekly_hours: value.weekly_hours,
            updated_at: value.updated_at,
        }
    }
}

/// Body of PUT /learning_profile
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpsertLearningProfileDTO {
    pub experience_level: ExperienceLevel,

    #[validate(length(max = 20, message = "At most 20 interests"))]
    #[serde(default)]
    pub interests: Vec<String>,

    #[validate(length(max = 1000, message = "Goals must be at most 1000 characters"))]
    #[serde(default)]
    pub goals: Option<String>,

    #[validate(range(min = 0, max = 168, message = "Weekly hours must be between 0 and 168"))]
    #[serde(default)]
    pub weekly_hours: Option<i64>,
}
