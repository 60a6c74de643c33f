//! Notification DTOs

use crate::entities::{Notification, NotificationKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NotificationDTO {
    pub notification_id: i64,
    pub actor_id: Option<i64>,
    pub kind: NotificationKind,
    pub blog_id: Option<i64>,
    pub topic_id: Option<i64>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationDTO {
    fn from(value: Notification) -> Self {
        Self {
            notification_id: value.notification_id,
            actor_id: value.actor_id,
            kind: value.kind,
            blog_id: value.blog_id,
            topic_id: value.topic_id,
            message: value.message,
            is_read: value.is_read,
            created_at: value.created_at,
        }
    }
}

/// DTO to create a notification (without notification_id)
#[derive(Debug, Clone)]
pub struct CreateNotificationDTO {
    pub recipient_id: i64,
    pub actor_id: Option<i64>,
    pub kind: NotificationKind,
    pub blog_id: Option<i64>,
    pub topic_id: Option<i64>,
    pub message: String,
}

impl CreateNotificationDTO {
    pub fn new(recipient_id: i64, actor_id: i64, kind: NotificationKind, message: String) -> Self {
        Self {
            recipient_id,
            actor_id: Some(actor_id),
            kind,
            blog_id: None,
            topic_id: None,
            message,
        }
    }

    pub fn on_blog(mut self, blog_id: i64) -> Self {
        self.blog_id = Some(blog_id);
        self
    }

    pub fn on_topic(mut self, topic_id: i64) -> Self {
        self.topic_id = Some(topic_id);
        self
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UnreadCountDTO {
    pub unread: i64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ReadAllDTO {
    pub updated: u64,
}
