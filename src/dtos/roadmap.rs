//! Roadmap DTOs

use crate::entities::{ExperienceLevel, RoadmapRecord, RoadmapStep};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of POST /roadmaps
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct GenerateRoadmapDTO {
    #[validate(length(min = 1, max = 200, message = "Topic must be between 1 and 200 characters"))]
    pub topic: String,

    /// Defaults to the caller's learning profile
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RoadmapDTO {
    pub roadmap_id: i64,
    pub topic: String,
    pub experience_level: ExperienceLevel,
    pub steps: Vec<RoadmapStep>,
    /// Steps whose enrichment request failed and carry no details
    #[serde(default)]
    pub failed_steps: Vec<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RoadmapRecord> for RoadmapDTO {
    fn from(value: RoadmapRecord) -> Self {
        Self {
            roadmap_id: value.roadmap_id,
            topic: value.topic,
            experience_level: value.experience_level,
            steps: value.steps.0,
            failed_steps: Vec::new(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl RoadmapDTO {
    pub fn with_failed_steps(mut self, failed_steps: Vec<u32>) -> Self {
        self.failed_steps = failed_steps;
        self
    }
}

/// DTO to create a roadmap row (without roadmap_id)
#[derive(Debug, Clone)]
pub struct CreateRoadmapDTO {
    pub user_id: i64,
    pub topic: String,
    pub experience_level: ExperienceLevel,
    pub steps: Vec<RoadmapStep>,
    pub created_at: DateTime<Utc>,
}
