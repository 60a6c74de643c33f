//! Community services - discussion board

use crate::core::{AppError, AppState};
use crate::dtos::topic::DEFAULT_CATEGORY;
use crate::dtos::{
    CreateNotificationDTO, CreateReplyDTO, CreateReplyRequestDTO, CreateTopicDTO,
    CreateTopicRequestDTO, ReplyDTO, TopicDTO, TopicDetailDTO, TopicQuery,
};
use crate::entities::{NotificationKind, User};
use crate::repositories::{Create, Delete, Read};
use crate::services::notification::notify;
use crate::services::trimmed_title;
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use validator::Validate;

#[instrument(skip(state, params))]
pub async fn list_topics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopicQuery>,
) -> Result<Json<Vec<TopicDTO>>, AppError> {
    // categories are stored lowercase
    let category = params
        .category
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty());
    let topics = state.topics.find_summaries(category.as_deref()).await?;
    debug!("Found {} topics", topics.len());
    Ok(Json(topics.into_iter().map(TopicDTO::from).collect()))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id))]
pub async fn create_topic(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<CreateTopicRequestDTO>,
) -> Result<(StatusCode, Json<TopicDTO>), AppError> {
    body.validate()?;
    let title = trimmed_title(&body.title)?;

    let category = body
        .category
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    let topic = state
        .topics
        .create(&CreateTopicDTO {
            author_id: current_user.user_id,
            title,
            content: body.content,
            category,
            created_at: Utc::now(),
        })
        .await?;
    info!(topic_id = topic.topic_id, "Topic created");

    let summary = state
        .topics
        .find_summary(&topic.topic_id)
        .await?
        .ok_or_else(|| AppError::internal_server_error("Topic vanished after creation"))?;
    Ok((StatusCode::CREATED, Json(TopicDTO::from(summary))))
}

#[instrument(skip(state), fields(topic_id = %topic_id))]
pub async fn get_topic(
    State(state): State<Arc<AppState>>,
    Path(topic_id): Path<i64>,
) -> Result<Json<TopicDetailDTO>, AppError> {
    let topic = state
        .topics
        .find_summary(&topic_id)
        .await?
        .ok_or_else(|| AppError::not_found("Topic not found"))?;
    let replies = state.topics.find_replies(&topic_id).await?;

    Ok(Json(TopicDetailDTO {
        topic: TopicDTO::from(topic),
        replies: replies.into_iter().map(ReplyDTO::from).collect(),
    }))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id, topic_id = %topic_id))]
pub async fn create_reply(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(topic_id): Path<i64>,
    Json(body): Json<CreateReplyRequestDTO>,
) -> Result<(StatusCode, Json<ReplyDTO>), AppError> {
    body.validate()?;
    let topic = state
        .topics
        .read(&topic_id)
        .await?
        .ok_or_else(|| AppError::not_found("Topic not found"))?;

    let reply = state
        .topics
        .create_reply(&CreateReplyDTO {
            topic_id,
            author_id: current_user.user_id,
            content: body.content,
            created_at: Utc::now(),
        })
        .await?;
    info!(reply_id = reply.reply_id, "Reply created");

    if topic.author_id != current_user.user_id {
        notify(
            &state,
            CreateNotificationDTO::new(
                topic.author_id,
                current_user.user_id,
                NotificationKind::TopicReply,
                format!("{} replied to \"{}\"", current_user.username, topic.title),
            )
            .on_topic(topic_id),
        )
        .await;
    }

    Ok((
        StatusCode::CREATED,
        Json(ReplyDTO {
            reply_id: reply.reply_id,
            topic_id: reply.topic_id,
            author_id: reply.author_id,
            author_username: current_user.username,
            content: reply.content,
            created_at: reply.created_at,
        }),
    ))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, topic_id = %topic_id))]
pub async fn delete_topic(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(topic_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let topic = state
        .topics
        .read(&topic_id)
        .await?
        .ok_or_else(|| AppError::not_found("Topic not found"))?;
    if topic.author_id != current_user.user_id {
        return Err(AppError::forbidden("Only the author can delete this topic"));
    }

    state.topics.delete(&topic_id).await?;
    info!("Topic deleted");
    Ok(StatusCode::NO_CONTENT)
}
