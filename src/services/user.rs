//! User services - search, profiles and account settings

use crate::core::auth::EXPIRED_SESSION_COOKIE;
use crate::core::{AppError, AppState};
use crate::dtos::{ChangePasswordDTO, ProfileDTO, UpdateProfileDTO, UserDTO, UserSearchQuery};
use crate::entities::User;
use crate::repositories::{Delete, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Assembles the profile view of `user` as seen by `viewer_id`
async fn build_profile(state: &AppState, user: User, viewer_id: i64) -> Result<ProfileDTO, AppError> {
    let profile = state.profiles.read(&user.user_id).await?;
    let followers = state.follows.count_followers(&user.user_id).await?;
    let following = state.follows.count_following(&user.user_id).await?;

    let followed_by_me = if user.user_id == viewer_id {
        None
    } else {
        Some(state.follows.is_following(&viewer_id, &user.user_id).await?)
    };

    let mut dto = ProfileDTO::build(user, profile, followers, following);
    dto.followed_by_me = followed_by_me;
    Ok(dto)
}

#[instrument(skip(state), fields(search = %params.search))]
pub async fn search_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserSearchQuery>,
) -> Result<Json<Vec<UserDTO>>, AppError> {
    debug!("Searching users by username prefix");
    let users = state
        .users
        .search_by_username_prefix(params.search.trim())
        .await?;
    info!("Found {} users matching search criteria", users.len());
    Ok(Json(users.into_iter().map(UserDTO::from).collect()))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn get_my_profile(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<ProfileDTO>, AppError> {
    let viewer = current_user.user_id;
    Ok(Json(build_profile(&state, current_user, viewer).await?))
}

#[instrument(skip(state, current_user), fields(user_id = %user_id))]
pub async fn get_user_profile(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(user_id): Path<i64>,
) -> Result<Json<ProfileDTO>, AppError> {
    debug!("Fetching profile");
    let user = state.users.read(&user_id).await?.ok_or_else(|| {
        warn!("User not found");
        AppError::not_found("User not found")
    })?;
    Ok(Json(build_profile(&state, user, current_user.user_id).await?))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id))]
pub async fn update_my_profile(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<UpdateProfileDTO>,
) -> Result<Json<ProfileDTO>, AppError> {
    body.validate()?;

    // accounts always get a profile at registration, this covers rows lost to manual edits
    state.profiles.create_empty(&current_user.user_id).await?;
    state.profiles.update(&current_user.user_id, &body).await?;
    info!("Profile updated");

    let viewer = current_user.user_id;
    Ok(Json(build_profile(&state, current_user, viewer).await?))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id))]
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<ChangePasswordDTO>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()?;

    if !current_user.verify_password(&body.current_password) {
        warn!("Wrong current password");
        return Err(AppError::unauthorized("Current password is not correct"));
    }

    let password_hash = User::hash_password(&body.new_password)
        .map_err(|_| AppError::internal_server_error("Failed to hash password"))?;
    state
        .users
        .update_password(&current_user.user_id, &password_hash)
        .await?;

    info!("Password changed");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, username = %current_user.username))]
pub async fn delete_my_account(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<impl IntoResponse, AppError> {
    info!("User account deletion initiated");
    // 1. Delete the user row, cascades remove profile, follows, blogs, comments,
    //    topics, replies, roadmaps, learning profile and stored documents
    // 2. Drop the live connection if any
    // 3. Expire the session cookie
    if !state.users.delete(&current_user.user_id).await? {
        return Err(AppError::not_found("User not found"));
    }

    state.users_online.disconnect(&current_user.user_id);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_static(EXPIRED_SESSION_COOKIE),
    );

    info!("User account deleted");
    Ok((StatusCode::NO_CONTENT, headers))
}
