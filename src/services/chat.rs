//! Chat services - sessions with the DSA assistant
//!
//! Sessions live in the key/value store as a single document per user, so
//! every change reads the whole list and writes it back.

use crate::core::{AppError, AppState};
use crate::dtos::{CreateSessionDTO, SendMessageDTO, SessionSummaryDTO};
use crate::entities::{ChatMessage, ChatSession, User};
use crate::llm::{ChatRole, CompletionRequest, LlmMessage, prompts};
use crate::storage;
use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

fn session_index(sessions: &[ChatSession], session_id: &Uuid) -> Result<usize, AppError> {
    sessions
        .iter()
        .position(|s| s.id == *session_id)
        .ok_or_else(|| AppError::not_found("Chat session not found"))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<Vec<SessionSummaryDTO>>, AppError> {
    let mut sessions = storage::load_sessions(&state.storage, &current_user.user_id).await?;
    sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    debug!("Found {} sessions", sessions.len());
    Ok(Json(sessions.iter().map(SessionSummaryDTO::from).collect()))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id))]
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<CreateSessionDTO>,
) -> Result<(StatusCode, Json<ChatSession>), AppError> {
    body.validate()?;

    let mut sessions = storage::load_sessions(&state.storage, &current_user.user_id).await?;
    let session = ChatSession::new(body.title);
    sessions.push(session.clone());
    storage::save_sessions(&state.storage, &current_user.user_id, &sessions).await?;

    info!(session_id = %session.id, "Chat session created");
    Ok((StatusCode::CREATED, Json(session)))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, session_id = %session_id))]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ChatSession>, AppError> {
    let mut sessions = storage::load_sessions(&state.storage, &current_user.user_id).await?;
    let index = session_index(&sessions, &session_id)?;
    Ok(Json(sessions.swap_remove(index)))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, session_id = %session_id))]
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let mut sessions = storage::load_sessions(&state.storage, &current_user.user_id).await?;
    let index = session_index(&sessions, &session_id)?;
    sessions.remove(index);
    storage::save_sessions(&state.storage, &current_user.user_id, &sessions).await?;

    info!("Chat session deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id, session_id = %session_id))]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<SendMessageDTO>,
) -> Result<Json<ChatSession>, AppError> {
    // 1. Append the user message to the session
    // 2. Send the system prompt plus the whole history in one completion
    // 3. Append the reply when there is one
    // 4. Save into a freshly loaded list either way, the user message survives a failed completion
    body.validate()?;

    let mut sessions = storage::load_sessions(&state.storage, &current_user.user_id).await?;
    let index = session_index(&sessions, &session_id)?;

    let session = &mut sessions[index];
    session.push(ChatMessage::new(ChatRole::User, body.content));

    let mut messages = Vec::with_capacity(session.messages.len() + 1);
    messages.push(LlmMessage::system(prompts::ASSISTANT_SYSTEM));
    messages.extend(session.messages.iter().map(LlmMessage::from));

    let result = state
        .llm
        .complete(CompletionRequest {
            messages,
            temperature: 0.7,
            max_tokens: 2048,
        })
        .await;

    match &result {
        Ok(reply) => session.push(ChatMessage::new(ChatRole::Assistant, reply.trim())),
        Err(e) => warn!("Assistant reply failed, keeping the user message: {}", e),
    }
    let session = session.clone();

    // the completion can take a while: merge into a fresh copy so sessions
    // created or deleted meanwhile are kept as they are now
    let mut latest = storage::load_sessions(&state.storage, &current_user.user_id).await?;
    match latest.iter_mut().find(|s| s.id == session_id) {
        Some(slot) => {
            *slot = session.clone();
            storage::save_sessions(&state.storage, &current_user.user_id, &latest).await?;
        }
        None => warn!("Session deleted while waiting for the reply, not saving it"),
    }
    result?;

    info!(messages = session.messages.len(), "Assistant replied");
    Ok(Json(session))
}
