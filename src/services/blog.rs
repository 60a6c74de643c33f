//! Blog services - posts, drafts and comments

use crate::core::{AppError, AppState};
use crate::dtos::{
    BlogDTO, BlogQuery, CommentDTO, CreateBlogDTO, CreateBlogRequestDTO, CreateCommentDTO,
    CreateCommentRequestDTO, CreateNotificationDTO, UpdateBlogDTO,
};
use crate::entities::{AuthoredBlog, Blog, NotificationKind, User};
use crate::repositories::{Create, Delete, Read, Update};
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
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

/// Loads a blog as seen by `viewer_id`; drafts of other authors do not exist
async fn visible_blog(
    state: &AppState,
    blog_id: &i64,
    viewer_id: i64,
) -> Result<AuthoredBlog, AppError> {
    match state.blogs.find_authored(blog_id).await? {
        Some(blog) if blog.blog.published || blog.blog.author_id == viewer_id => Ok(blog),
        _ => {
            warn!(blog_id, "Blog not found or not visible");
            Err(AppError::not_found("Blog not found"))
        }
    }
}

/// Loads a blog the caller is about to change
async fn owned_blog(state: &AppState, blog_id: &i64, user_id: i64) -> Result<Blog, AppError> {
    let blog = state
        .blogs
        .read(blog_id)
        .await?
        .ok_or_else(|| AppError::not_found("Blog not found"))?;
    if blog.author_id != user_id {
        warn!(blog_id, "User is not the author");
        return Err(AppError::forbidden("Only the author can change this blog"));
    }
    Ok(blog)
}

/// Tells every follower of the author about a newly published blog, once
/// per blog. Like `notify`, failures are logged and never reach the caller.
async fn announce_blog(state: &AppState, author: &User, blog: &Blog) {
    match state.blogs.claim_announcement(&blog.blog_id).await {
        Ok(true) => {}
        Ok(false) => {
            debug!(blog_id = blog.blog_id, "Blog already announced");
            return;
        }
        Err(e) => {
            error!("Failed to mark blog as announced: {:?}", e);
            return;
        }
    }

    let followers = match state.follows.follower_ids(&author.user_id).await {
        Ok(followers) => followers,
        Err(e) => {
            error!("Failed to load followers, blog not announced: {:?}", e);
            return;
        }
    };

    debug!(followers = followers.len(), "Announcing blog");
    for follower_id in followers {
        notify(
            state,
            CreateNotificationDTO::new(
                follower_id,
                author.user_id,
                NotificationKind::NewBlog,
                format!("{} published \"{}\"", author.username, blog.title),
            )
            .on_blog(blog.blog_id),
        )
        .await;
    }
}

#[instrument(skip(state, params))]
pub async fn list_blogs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BlogQuery>,
) -> Result<Json<Vec<BlogDTO>>, AppError> {
    let blogs = state
        .blogs
        .find_published(params.search.as_deref(), params.author_id)
        .await?;
    debug!("Found {} blogs", blogs.len());
    Ok(Json(blogs.into_iter().map(BlogDTO::from).collect()))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn list_feed(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<Vec<BlogDTO>>, AppError> {
    let blogs = state.blogs.find_feed(&current_user.user_id).await?;
    Ok(Json(blogs.into_iter().map(BlogDTO::from).collect()))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn list_my_blogs(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<Vec<BlogDTO>>, AppError> {
    let blogs = state.blogs.find_by_author(&current_user.user_id).await?;
    Ok(Json(blogs.into_iter().map(BlogDTO::from).collect()))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id))]
pub async fn create_blog(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<CreateBlogRequestDTO>,
) -> Result<(StatusCode, Json<BlogDTO>), AppError> {
    // 1. Validate title and content
    // 2. Store the blog, published or as a draft
    // 3. Publishing notifies the followers
    body.validate()?;
    let title = trimmed_title(&body.title)?;

    let blog = state
        .blogs
        .create(&CreateBlogDTO {
            author_id: current_user.user_id,
            title,
            content: body.content,
            cover_image_url: body.cover_image_url.filter(|u| !u.trim().is_empty()),
            published: body.published,
            created_at: Utc::now(),
        })
        .await?;
    info!(blog_id = blog.blog_id, published = blog.published, "Blog created");

    if blog.published {
        announce_blog(&state, &current_user, &blog).await;
    }

    let authored = state
        .blogs
        .find_authored(&blog.blog_id)
        .await?
        .ok_or_else(|| AppError::internal_server_error("Blog vanished after creation"))?;
    Ok((StatusCode::CREATED, Json(BlogDTO::from(authored))))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, blog_id = %blog_id))]
pub async fn get_blog(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(blog_id): Path<i64>,
) -> Result<Json<BlogDTO>, AppError> {
    let blog = visible_blog(&state, &blog_id, current_user.user_id).await?;
    Ok(Json(BlogDTO::from(blog)))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id, blog_id = %blog_id))]
pub async fn update_blog(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(blog_id): Path<i64>,
    Json(mut body): Json<UpdateBlogDTO>,
) -> Result<Json<BlogDTO>, AppError> {
    body.validate()?;
    body.title = body.title.as_deref().map(trimmed_title).transpose()?;
    let before = owned_blog(&state, &blog_id, current_user.user_id).await?;

    let after = state.blogs.update(&blog_id, &body).await?;
    info!("Blog updated");

    if !before.published && after.published {
        announce_blog(&state, &current_user, &after).await;
    }

    let authored = state
        .blogs
        .find_authored(&blog_id)
        .await?
        .ok_or_else(|| AppError::not_found("Blog not found"))?;
    Ok(Json(BlogDTO::from(authored)))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, blog_id = %blog_id))]
pub async fn delete_blog(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(blog_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    owned_blog(&state, &blog_id, current_user.user_id).await?;
    state.blogs.delete(&blog_id).await?;
    info!("Blog deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, current_user), fields(blog_id = %blog_id))]
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(blog_id): Path<i64>,
) -> Result<Json<Vec<CommentDTO>>, AppError> {
    visible_blog(&state, &blog_id, current_user.user_id).await?;
    let comments = state.comments.find_by_blog(&blog_id).await?;
    Ok(Json(comments.into_iter().map(CommentDTO::from).collect()))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id, blog_id = %blog_id))]
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(blog_id): Path<i64>,
    Json(body): Json<CreateCommentRequestDTO>,
) -> Result<(StatusCode, Json<CommentDTO>), AppError> {
    body.validate()?;
    let blog = visible_blog(&state, &blog_id, current_user.user_id).await?;

    let comment = state
        .comments
        .create(&CreateCommentDTO {
            blog_id,
            author_id: current_user.user_id,
            content: body.content,
            created_at: Utc::now(),
        })
        .await?;
    info!(comment_id = comment.comment_id, "Comment created");

    if blog.blog.author_id != current_user.user_id {
        notify(
            &state,
            CreateNotificationDTO::new(
                blog.blog.author_id,
                current_user.user_id,
                NotificationKind::Comment,
                format!(
                    "{} commented on \"{}\"",
                    current_user.username, blog.blog.title
                ),
            )
            .on_blog(blog_id),
        )
        .await;
    }

    Ok((
        StatusCode::CREATED,
        Json(CommentDTO {
            comment_id: comment.comment_id,
            blog_id: comment.blog_id,
            author_id: comment.author_id,
            author_username: current_user.username,
            content: comment.content,
            created_at: comment.created_at,
        }),
    ))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, comment_id = %comment_id))]
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(comment_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let comment = state
        .comments
        .read(&comment_id)
        .await?
        .ok_or_else(|| AppError::not_found("Comment not found"))?;

    // the blog author moderates the comments under their post
    if comment.author_id != current_user.user_id {
        let blog_author = state.blogs.read(&comment.blog_id).await?.map(|b| b.author_id);
        if blog_author != Some(current_user.user_id) {
            return Err(AppError::forbidden("You cannot delete this comment"));
        }
    }

    state.comments.delete(&comment_id).await?;
    info!("Comment deleted");
    Ok(StatusCode::NO_CONTENT)
}
