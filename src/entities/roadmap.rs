//! Roadmap entities - generated curricula
//!
//! `Roadmap` is the document produced by the wizard and stored both as the
//! active roadmap blob and inside a `roadmaps` row (`RoadmapRecord`).

use super::enums::ExperienceLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Roadmap {
    pub experience_level: ExperienceLevel,
    pub topic: String,
    pub steps: Vec<RoadmapStep>,
}

impl Roadmap {
    pub fn step(&self, number: u32) -> Option<&RoadmapStep> {
        self.steps.iter().find(|s| s.step == number)
    }

    pub fn step_mut(&mut self, number: u32) -> Option<&mut RoadmapStep> {
        self.steps.iter_mut().find(|s| s.step == number)
    }
}

fn default_icon() -> String {
    "book".to_string()
}

/// One step of a roadmap. Every field tolerates being absent in model output.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RoadmapStep {
    #[serde(default)]
    pub step: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    /// Filled by enrichment, None when enrichment failed or did not run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<StepDetails>,
}

impl RoadmapStep {
    pub fn new(step: u32, title: &str, description: &str, icon: &str) -> Self {
        Self {
            step,
            title: title.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            details: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct StepDetails {
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Chapter {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Section {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub items: Vec<String>,
}

/// Stored roadmap row
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct RoadmapRecord {
    pub roadmap_id: i64,
    pub user_id: i64,
    pub topic: String,
    pub experience_level: ExperienceLevel,
    pub steps: Json<Vec<RoadmapStep>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoadmapRecord {
    pub fn to_roadmap(&self) -> Roadmap {
        Roadmap {
            experience_level: self.experience_level,
            topic: self.topic.clone(),
            steps: self.steps.0.clone(),
        }
    }
}

/// Document kept under the `active_roadmap` key of the key/value store
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActiveRoadmap {
    /// Row the document was saved from, None when it was never stored
    #[serde(default)]
    pub roadmap_id: Option<i64>,
    pub roadmap: Roadmap,
    pub saved_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_defaults_fill_missing_fields() {
        let step: RoadmapStep = serde_json::from_str(r#"{"title": "Graphs"}"#).unwrap();
        assert_eq!(step.step, 0);
        assert_eq!(step.icon, "book");
        assert!(step.details.is_none());
    }

    #[test]
    fn absent_details_are_not_serialized() {
        let step = RoadmapStep::new(1, "Arrays", "Basics", "code");
        let json = serde_json::to_value(&step).unwrap();
        assert!(json.get("details").is_none());
    }
}
