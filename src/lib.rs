//! ALGORITHMS server library - exposes the modules and the router for the binary and the tests

pub mod core;
pub mod dtos;
pub mod entities;
pub mod llm;
pub mod repositories;
pub mod roadmap;
pub mod services;
pub mod storage;
pub mod ws;

// Re-export the main types
pub use core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{any, delete, get, patch, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

/// Builds the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    use core::authentication_middleware;
    use ws::ws_handler;

    Router::new()
        .route("/", get(root))
        .nest("/auth", configure_auth_routes())
        .merge(configure_authenticated_routes(state.clone()))
        .route(
            "/ws",
            any(ws_handler).layer(middleware::from_fn_with_state(
                state.clone(),
                authentication_middleware,
            )),
        )
        .with_state(state)
}

/// Cross-origin policy: one configured origin with credentials, or anything
/// goes when none is configured
pub fn cors_layer(allowed_origin: Option<HeaderValue>) -> CorsLayer {
    match allowed_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .expose_headers([header::AUTHORIZATION])
            .allow_credentials(true)
            .max_age(Duration::from_secs(60 * 60)),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers([header::AUTHORIZATION]),
    }
}

/// Login and registration, the only routes without a token
fn configure_auth_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/login", post(login_user))
        .route("/register", post(register_user))
}

/// Every area behind the authentication middleware
fn configure_authenticated_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use core::authentication_middleware;

    Router::new()
        .nest("/users", configure_user_routes())
        .nest("/blogs", configure_blog_routes())
        .nest("/comments", configure_comment_routes())
        .nest("/notifications", configure_notification_routes())
        .nest("/community", configure_community_routes())
        .nest("/learning_profile", configure_learning_profile_routes())
        .nest("/roadmaps", configure_roadmap_routes())
        .nest("/dsa", configure_dsa_routes())
        .nest("/chat", configure_chat_routes())
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Search, profiles, settings and the follower graph
fn configure_user_routes() -> Router<Arc<AppState>> {
    use services::*;

    Router::new()
        .route("/", get(search_users))
        .route(
            "/me",
            get(get_my_profile)
                .patch(update_my_profile)
                .delete(delete_my_account),
        )
        .route("/me/password", patch(change_password))
        .route("/{user_id}", get(get_user_profile))
        .route("/{user_id}/follow", post(follow_user).delete(unfollow_user))
        .route("/{user_id}/followers", get(list_followers))
        .route("/{user_id}/following", get(list_following))
}

fn configure_blog_routes() -> Router<Arc<AppState>> {
    use services::*;

    Router::new()
        .route("/", get(list_blogs).post(create_blog))
        .route("/feed", get(list_feed))
        .route("/mine", get(list_my_blogs))
        .route(
            "/{blog_id}",
            get(get_blog).patch(update_blog).delete(delete_blog),
        )
        .route(
            "/{blog_id}/comments",
            get(list_comments).post(create_comment),
        )
}

fn configure_comment_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new().route("/{comment_id}", delete(delete_comment))
}

fn configure_notification_routes() -> Router<Arc<AppState>> {
    use services::*;

    Router::new()
        .route("/", get(list_notifications))
        .route("/unread_count", get(unread_count))
        .route("/read_all", post(mark_all_read))
        .route("/{notification_id}", delete(delete_notification))
        .route("/{notification_id}/read", post(mark_read))
}

fn configure_community_routes() -> Router<Arc<AppState>> {
    use services::*;

    Router::new()
        .route("/topics", get(list_topics).post(create_topic))
        .route("/topics/{topic_id}", get(get_topic).delete(delete_topic))
        .route("/topics/{topic_id}/replies", post(create_reply))
}

fn configure_learning_profile_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new().route(
        "/",
        get(get_learning_profile).put(upsert_learning_profile),
    )
}

/// Wizard generation, history and the active roadmap
fn configure_roadmap_routes() -> Router<Arc<AppState>> {
    use services::*;

    Router::new()
        .route("/", get(list_roadmaps).post(generate_roadmap))
        .route(
            "/active",
            get(get_active_roadmap).delete(clear_active_roadmap),
        )
        .route("/{roadmap_id}", get(get_roadmap).delete(delete_roadmap))
        .route("/{roadmap_id}/activate", post(activate_roadmap))
        .route(
            "/{roadmap_id}/steps/{step}/enrich",
            post(enrich_roadmap_step),
        )
}

fn configure_dsa_routes() -> Router<Arc<AppState>> {
    use services::*;

    Router::new()
        .route("/problems", post(generate_problem))
        .route("/review", post(review_code))
}

fn configure_chat_routes() -> Router<Arc<AppState>> {
    use services::*;

    Router::new()
        .route("/sessions", get(list_sessions).post(create_session))
        .route(
            "/sessions/{session_id}",
            get(get_session).delete(delete_session),
        )
        .route("/sessions/{session_id}/messages", post(send_message))
}
