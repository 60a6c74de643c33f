//! Notification entity

use super::enums::NotificationKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Notification {
    pub notification_id: i64,
    pub recipient_id: i64,
    // None once the actor deleted the account
    pub actor_id: Option<i64>,
    pub kind: NotificationKind,
    pub blog_id: Option<i64>,
    pub topic_id: Option<i64>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
