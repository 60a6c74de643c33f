//! Follow services - follower graph

use crate::core::{AppError, AppState};
use crate::dtos::CreateNotificationDTO;
use crate::entities::{Follow, NotificationKind, User, UserSummary};
use crate::repositories::Read;
use crate::services::notification::notify;
use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, target_id = %target_id))]
pub async fn follow_user(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(target_id): Path<i64>,
) -> Result<(StatusCode, Json<Follow>), AppError> {
    // 1. Users cannot follow themselves
    // 2. The target must exist
    // 3. Following twice is a conflict
    // 4. Store the edge and notify the target
    if target_id == current_user.user_id {
        return Err(AppError::bad_request("You cannot follow yourself"));
    }

    if state.users.read(&target_id).await?.is_none() {
        warn!("Follow target not found");
        return Err(AppError::not_found("User not found"));
    }

    if state
        .follows
        .is_following(&current_user.user_id, &target_id)
        .await?
    {
        return Err(AppError::conflict("Already following this user"));
    }

    let follow = state.follows.follow(&current_user.user_id, &target_id).await?;
    info!("User followed");

    notify(
        &state,
        CreateNotificationDTO::new(
            target_id,
            current_user.user_id,
            NotificationKind::Follow,
            format!("{} started following you", current_user.username),
        ),
    )
    .await;

    Ok((StatusCode::CREATED, Json(follow)))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, target_id = %target_id))]
pub async fn unfollow_user(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(target_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !state
        .follows
        .unfollow(&current_user.user_id, &target_id)
        .await?
    {
        return Err(AppError::not_found("You are not following this user"));
    }
    info!("User unfollowed");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state), fields(user_id = %user_id))]
pub async fn list_followers(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    if state.users.read(&user_id).await?.is_none() {
        return Err(AppError::not_found("User not found"));
    }
    Ok(Json(state.follows.followers_of(&user_id).await?))
}

#[instrument(skip(state), fields(user_id = %user_id))]
pub async fn list_following(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    if state.users.read(&user_id).await?.is_none() {
        return Err(AppError::not_found("User not found"));
    }
    Ok(Json(state.follows.following_of(&user_id).await?))
}
