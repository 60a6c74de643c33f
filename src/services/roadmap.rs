//! Roadmap services - wizard generation, history and the active roadmap

use crate::core::{AppError, AppState};
use crate::dtos::{CreateRoadmapDTO, GenerateRoadmapDTO, RoadmapDTO};
use crate::entities::{ActiveRoadmap, ExperienceLevel, Roadmap, RoadmapRecord, User};
use crate::repositories::{Create, Delete, Read};
use crate::roadmap::RoadmapGenerator;
use crate::storage::{self, ACTIVE_ROADMAP_KEY};
use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Loads a roadmap row of `user_id`; rows of other users do not exist
async fn owned_roadmap(
    state: &AppState,
    roadmap_id: &i64,
    user_id: i64,
) -> Result<RoadmapRecord, AppError> {
    match state.roadmaps.read(roadmap_id).await? {
        Some(record) if record.user_id == user_id => Ok(record),
        _ => {
            warn!(roadmap_id, "Roadmap not found for user");
            Err(AppError::not_found("Roadmap not found"))
        }
    }
}

async fn set_active(
    state: &AppState,
    user_id: &i64,
    roadmap_id: i64,
    roadmap: Roadmap,
) -> Result<ActiveRoadmap, AppError> {
    let active = ActiveRoadmap {
        roadmap_id: Some(roadmap_id),
        roadmap,
        saved_at: Utc::now(),
    };
    storage::save_active_roadmap(&state.storage, user_id, &active).await?;
    Ok(active)
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id, topic = %body.topic))]
pub async fn generate_roadmap(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<GenerateRoadmapDTO>,
) -> Result<(StatusCode, Json<RoadmapDTO>), AppError> {
    // 1. Validate the topic
    // 2. Pick the level: request, then learning profile, then beginner
    // 3. Outline plus sequential enrichment of every step
    // 4. Store the row and make it the active roadmap
    body.validate()?;
    let topic = body.topic.trim().to_string();
    if topic.is_empty() {
        return Err(AppError::bad_request("Topic must not be blank"));
    }

    let level = match body.experience_level {
        Some(level) => level,
        None => state
            .learning_profiles
            .read(&current_user.user_id)
            .await?
            .map(|p| p.experience_level)
            .unwrap_or(ExperienceLevel::Beginner),
    };
    debug!(%level, "Generating roadmap");

    let generated = RoadmapGenerator::new(state.llm.as_ref())
        .generate(&topic, level)
        .await?;

    let record = state
        .roadmaps
        .create(&CreateRoadmapDTO {
            user_id: current_user.user_id,
            topic: generated.roadmap.topic.clone(),
            experience_level: generated.roadmap.experience_level,
            steps: generated.roadmap.steps.clone(),
            created_at: Utc::now(),
        })
        .await?;

    set_active(
        &state,
        &current_user.user_id,
        record.roadmap_id,
        generated.roadmap,
    )
    .await?;

    info!(
        roadmap_id = record.roadmap_id,
        failed = generated.failed_steps.len(),
        "Roadmap stored"
    );
    Ok((
        StatusCode::CREATED,
        Json(RoadmapDTO::from(record).with_failed_steps(generated.failed_steps)),
    ))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn list_roadmaps(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<Vec<RoadmapDTO>>, AppError> {
    let records = state.roadmaps.find_by_user(&current_user.user_id).await?;
    Ok(Json(records.into_iter().map(RoadmapDTO::from).collect()))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, roadmap_id = %roadmap_id))]
pub async fn get_roadmap(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(roadmap_id): Path<i64>,
) -> Result<Json<RoadmapDTO>, AppError> {
    let record = owned_roadmap(&state, &roadmap_id, current_user.user_id).await?;
    Ok(Json(RoadmapDTO::from(record)))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, roadmap_id = %roadmap_id))]
pub async fn delete_roadmap(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(roadmap_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    owned_roadmap(&state, &roadmap_id, current_user.user_id).await?;
    state.roadmaps.delete(&roadmap_id).await?;

    // the active copy must not outlive its row
    let active = storage::load_active_roadmap(&state.storage, &current_user.user_id).await?;
    if active.is_some_and(|a| a.roadmap_id == Some(roadmap_id)) {
        state
            .storage
            .remove_item(&current_user.user_id, ACTIVE_ROADMAP_KEY)
            .await?;
        debug!("Active roadmap cleared");
    }

    info!("Roadmap deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, roadmap_id = %roadmap_id, step = %step))]
pub async fn enrich_roadmap_step(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path((roadmap_id, step)): Path<(i64, u32)>,
) -> Result<Json<RoadmapDTO>, AppError> {
    // 1. Load the owned row and the requested step
    // 2. One enrichment request for that step only
    // 3. Save the row, and the active copy when it points at this row
    let record = owned_roadmap(&state, &roadmap_id, current_user.user_id).await?;
    let mut roadmap = record.to_roadmap();
    let target = roadmap
        .step(step)
        .cloned()
        .ok_or_else(|| AppError::not_found("Step not found"))?;

    let details = RoadmapGenerator::new(state.llm.as_ref())
        .enrich_step(&roadmap, &target)
        .await?;
    if let Some(slot) = roadmap.step_mut(step) {
        slot.details = Some(details);
    }

    let record = state
        .roadmaps
        .update_steps(&roadmap_id, &roadmap.steps)
        .await?;

    let active = storage::load_active_roadmap(&state.storage, &current_user.user_id).await?;
    if active.is_some_and(|a| a.roadmap_id == Some(roadmap_id)) {
        set_active(&state, &current_user.user_id, roadmap_id, roadmap).await?;
        debug!("Active roadmap refreshed");
    }

    info!("Roadmap step enriched");
    Ok(Json(RoadmapDTO::from(record)))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn get_active_roadmap(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<ActiveRoadmap>, AppError> {
    let active = storage::load_active_roadmap(&state.storage, &current_user.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("No active roadmap"))?;
    Ok(Json(active))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, roadmap_id = %roadmap_id))]
pub async fn activate_roadmap(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(roadmap_id): Path<i64>,
) -> Result<Json<ActiveRoadmap>, AppError> {
    let record = owned_roadmap(&state, &roadmap_id, current_user.user_id).await?;
    let active = set_active(
        &state,
        &current_user.user_id,
        roadmap_id,
        record.to_roadmap(),
    )
    .await?;
    info!("Roadmap activated");
    Ok(Json(active))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn clear_active_roadmap(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<impl IntoResponse, AppError> {
    if !state
        .storage
        .remove_item(&current_user.user_id, ACTIVE_ROADMAP_KEY)
        .await?
    {
        return Err(AppError::not_found("No active roadmap"));
    }
    Ok(StatusCode::NO_CONTENT)
}
