//! Services module - HTTP handlers grouped by area
//!
//! Each sub-module owns the endpoints of one area of the platform.
//! Handlers validate input, call the repositories and map results to DTOs.

pub mod auth;
pub mod blog;
pub mod chat;
pub mod community;
pub mod dsa;
pub mod follow;
pub mod learning_profile;
pub mod notification;
pub mod roadmap;
pub mod user;

// Re-exports to keep the router readable
pub use auth::{login_user, register_user};
pub use blog::{
    create_blog, create_comment, delete_blog, delete_comment, get_blog, list_blogs,
    list_comments, list_feed, list_my_blogs, update_blog,
};
pub use chat::{create_session, delete_session, get_session, list_sessions, send_message};
pub use community::{create_reply, create_topic, delete_topic, get_topic, list_topics};
pub use dsa::{generate_problem, review_code};
pub use follow::{follow_user, list_followers, list_following, unfollow_user};
pub use learning_profile::{get_learning_profile, upsert_learning_profile};
pub use notification::{
    delete_notification, list_notifications, mark_all_read, mark_read, notify, unread_count,
};
pub use roadmap::{
    activate_roadmap, clear_active_roadmap, delete_roadmap, enrich_roadmap_step,
    generate_roadmap, get_active_roadmap, get_roadmap, list_roadmaps,
};
pub use user::{
    change_password, delete_my_account, get_my_profile, get_user_profile, search_users,
    update_my_profile,
};

use crate::{AppError, AppState};
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Trims a title and rejects what is left blank. Length limits are checked
/// by `Validate` on the raw body.
pub(crate) fn trimmed_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::bad_request("Validation error").with_details("Title must not be blank"));
    }
    Ok(title.to_string())
}

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
