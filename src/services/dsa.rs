//! DSA trainer services - generated problems and code review

use crate::core::{AppError, AppState};
use crate::dtos::{CodeReviewDTO, DsaProblemDTO, GenerateProblemDTO, ReviewRequestDTO};
use crate::entities::User;
use crate::llm::{CompletionRequest, parse_json, parse_or, prompts};
use axum::{
    Extension,
    extract::{Json, State},
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id, topic = %body.topic))]
pub async fn generate_problem(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<GenerateProblemDTO>,
) -> Result<Json<DsaProblemDTO>, AppError> {
    body.validate()?;

    let request = CompletionRequest::prompt(
        prompts::DSA_PROBLEM_SYSTEM,
        prompts::dsa_problem(body.topic.trim(), body.difficulty.as_str()),
    )
    .with_temperature(0.8)
    .with_max_tokens(2048);

    let raw = state.llm.complete(request).await?;

    // a problem cannot be invented locally, so malformed output is an upstream failure
    let mut problem: DsaProblemDTO = parse_json(&raw).ok_or_else(|| {
        warn!("Problem reply carried no usable JSON");
        AppError::bad_gateway("Completion API returned a malformed problem")
    })?;
    if problem.difficulty.is_none() {
        problem.difficulty = Some(body.difficulty);
    }

    info!(title = %problem.title, "Problem generated");
    Ok(Json(problem))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id, language = %body.language))]
pub async fn review_code(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<ReviewRequestDTO>,
) -> Result<Json<CodeReviewDTO>, AppError> {
    body.validate()?;

    let request = CompletionRequest::prompt(
        prompts::CODE_REVIEW_SYSTEM,
        prompts::code_review(&body.problem, body.language.trim(), &body.code),
    )
    .with_temperature(0.2)
    .with_max_tokens(2048);

    let raw = state.llm.complete(request).await?;
    let review = parse_or(&raw, || CodeReviewDTO::from_free_text(&raw));

    info!(correct = review.correct, "Code reviewed");
    Ok(Json(review))
}
