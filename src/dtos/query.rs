//! Query DTOs - query string parameters

use serde::{Deserialize, Serialize};

/// GET /users?search=
#[derive(Serialize, Deserialize, Debug)]
pub struct UserSearchQuery {
    pub search: String,
}

/// GET /blogs?search=&author_id=
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct BlogQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub author_id: Option<i64>,
}

/// GET /notifications?unread_only=
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct NotificationsQuery {
    #[serde(default)]
    pub unread_only: bool,
}

/// GET /community/topics?category=
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct TopicQuery {
    #[serde(default)]
    pub category: Option<String>,
}
