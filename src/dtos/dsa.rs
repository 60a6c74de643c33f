//! DSA trainer DTOs - generated problems and code reviews

use crate::entities::Difficulty;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

/// Body of POST /dsa/problems
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct GenerateProblemDTO {
    #[validate(length(min = 1, max = 100, message = "Topic must be between 1 and 100 characters"))]
    pub topic: String,
    pub difficulty: Difficulty,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProblemExample {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Problem as produced by the model
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DsaProblemDTO {
    pub title: String,
    /// Anything that is not a known difficulty reads as absent
    #[serde(default, deserialize_with = "lenient_difficulty")]
    pub difficulty: Option<Difficulty>,
    pub statement: String,
    #[serde(default)]
    pub examples: Vec<ProblemExample>,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default)]
    pub starter_code: Option<String>,
}

fn lenient_difficulty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Difficulty>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|raw| raw.parse().ok()))
}

/// Body of POST /dsa/review
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct ReviewRequestDTO {
    #[validate(length(min = 1, max = 20000, message = "Problem must be between 1 and 20000 characters"))]
    pub problem: String,

    #[validate(length(min = 1, max = 30, message = "Language must be between 1 and 30 characters"))]
    pub language: String,

    #[validate(length(min = 1, max = 50000, message = "Code must be between 1 and 50000 characters"))]
    pub code: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CodeReviewDTO {
    #[serde(default)]
    pub correct: bool,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub time_complexity: Option<String>,
    #[serde(default)]
    pub space_complexity: Option<String>,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl CodeReviewDTO {
    /// Review built from a reply that carried no usable JSON
    pub fn from_free_text(raw: &str) -> Self {
        Self {
            correct: false,
            summary: raw.trim().to_string(),
            time_complexity: None,
            space_complexity: None,
            issues: Vec::new(),
            suggestions: Vec::new(),
        }
    }
}
