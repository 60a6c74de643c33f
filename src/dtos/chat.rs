//! Chat DTOs - assistant sessions

use crate::entities::ChatSession;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct CreateSessionDTO {
    #[validate(length(max = 100, message = "Title must be at most 100 characters"))]
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct SendMessageDTO {
    #[validate(length(min = 1, max = 8000, message = "Message must be between 1 and 8000 characters"))]
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SessionSummaryDTO {
    pub id: Uuid,
    pub title: String,
    pub message_count: usize,
    pub updated_at: DateTime<Utc>,
}

impl From<&ChatSession> for SessionSummaryDTO {
    fn from(value: &ChatSession) -> Self {
        Self {
            id: value.id,
            title: value.title.clone(),
            message_count: value.messages.len(),
            updated_at: value.updated_at,
        }
    }
}
