//! Notification services - inbox endpoints and delivery

use crate::core::{AppError, AppState};
use crate::dtos::{
    CreateNotificationDTO, NotificationDTO, NotificationsQuery, ReadAllDTO, UnreadCountDTO,
    WsEventDTO,
};
use crate::entities::{Notification, User};
use crate::repositories::{Create, Delete, Read};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Inbox page size
const MAX_NOTIFICATIONS: i64 = 100;

/// Stores a notification and pushes it to the recipient when online.
///
/// Notifications are a side effect of another operation, so a failure here
/// is logged and never fails the caller.
#[instrument(skip(state, data), fields(recipient_id = data.recipient_id, kind = ?data.kind))]
pub async fn notify(state: &AppState, data: CreateNotificationDTO) -> Option<Notification> {
    let notification = match state.notifications.create(&data).await {
        Ok(notification) => notification,
        Err(e) => {
            error!("Failed to store notification: {:?}", e);
            return None;
        }
    };

    let pushed = state.users_online.send_if_online(
        &notification.recipient_id,
        WsEventDTO::Notification(NotificationDTO::from(notification.clone())),
    );
    debug!(pushed, "Notification stored");
    Some(notification)
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Query(params): Query<NotificationsQuery>,
) -> Result<Json<Vec<NotificationDTO>>, AppError> {
    let notifications = state
        .notifications
        .find_for_user(&current_user.user_id, params.unread_only, MAX_NOTIFICATIONS)
        .await?;
    debug!("Found {} notifications", notifications.len());
    Ok(Json(
        notifications.into_iter().map(NotificationDTO::from).collect(),
    ))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn unread_count(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<UnreadCountDTO>, AppError> {
    let unread = state.notifications.count_unread(&current_user.user_id).await?;
    Ok(Json(UnreadCountDTO { unread }))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, notification_id = %notification_id))]
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(notification_id): Path<i64>,
) -> Result<Json<NotificationDTO>, AppError> {
    let notification = state
        .notifications
        .mark_read(&notification_id, &current_user.user_id)
        .await?
        .ok_or_else(|| {
            warn!("Notification not found for user");
            AppError::not_found("Notification not found")
        })?;
    Ok(Json(NotificationDTO::from(notification)))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<ReadAllDTO>, AppError> {
    let updated = state.notifications.mark_all_read(&current_user.user_id).await?;
    info!(updated, "Notifications marked as read");
    Ok(Json(ReadAllDTO { updated }))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, notification_id = %notification_id))]
pub async fn delete_notification(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(notification_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    // other users' notifications are reported as missing
    match state.notifications.read(&notification_id).await? {
        Some(n) if n.recipient_id == current_user.user_id => {}
        _ => return Err(AppError::not_found("Notification not found")),
    }

    state.notifications.delete(&notification_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
