//! Learning profile services - wizard answers

use crate::core::{AppError, AppState};
use crate::dtos::{LearningProfileDTO, UpsertLearningProfileDTO};
use crate::entities::User;
use crate::repositories::Read;
use axum::{
    Extension,
    extract::{Json, State},
};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn get_learning_profile(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<LearningProfileDTO>, AppError> {
    let profile = state
        .learning_profiles
        .read(&current_user.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Learning profile not found"))?;
    Ok(Json(LearningProfileDTO::from(profile)))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id, level = %body.experience_level))]
pub async fn upsert_learning_profile(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<UpsertLearningProfileDTO>,
) -> Result<Json<LearningProfileDTO>, AppError> {
    body.validate()?;
    let profile = state
        .learning_profiles
        .upsert(&current_user.user_id, &body)
        .await?;
    info!("Learning profile saved");
    Ok(Json(LearningProfileDTO::from(profile)))
}
