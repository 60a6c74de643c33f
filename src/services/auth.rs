//! Auth services - registration and login

use crate::core::auth::session_cookie;
use crate::core::{AppError, AppState, encode_jwt};
use crate::dtos::{CreateUserDTO, LoginDTO, UserDTO};
use crate::entities::User;
use crate::repositories::Create;
use axum::{
    extract::{Json, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

lazy_static! {
    static ref USERNAME_PATTERN: Regex =
        Regex::new(r"^[A-Za-z0-9_]+$").expect("username pattern is valid");
}

#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginDTO>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Login attempt");
    // 1. Look the user up by username, unknown users get the same answer as a wrong password
    // 2. Verify the password against the stored hash
    // 3. Issue a JWT and hand it back both as a bearer header and as an HttpOnly cookie

    let user = match state.users.find_by_username(&body.username).await? {
        Some(user) => user,
        None => {
            warn!("Login for unknown username");
            return Err(AppError::unauthorized("Username or password are not correct"));
        }
    };

    if !user.verify_password(&body.password) {
        warn!("Wrong password");
        return Err(AppError::unauthorized("Username or password are not correct"));
    }

    let token = encode_jwt(user.username.clone(), user.user_id, &state.jwt_secret)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&session_cookie(&token))
            .map_err(|_| AppError::internal_server_error("Failed to build session cookie"))?,
    );
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| AppError::internal_server_error("Failed to build authorization header"))?,
    );

    info!(user_id = user.user_id, "User logged in");
    Ok((StatusCode::OK, headers, Json(UserDTO::from(user))))
}

#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateUserDTO>,
) -> Result<impl IntoResponse, AppError> {
    // 1. Validate lengths, email format and the username charset
    // 2. Reject taken usernames with 409 before hashing
    // 3. Store the bcrypt hash, never the plain password
    // 4. Create the empty profile edited later from the settings page
    body.validate()?;
    if !USERNAME_PATTERN.is_match(&body.username) {
        return Err(AppError::bad_request("Validation error")
            .with_details("Username may contain only letters, digits and underscores"));
    }

    if state.users.find_by_username(&body.username).await?.is_some() {
        warn!("Username already taken");
        return Err(AppError::conflict("Username already exists"));
    }

    let password_hash = User::hash_password(&body.password)
        .map_err(|_| AppError::internal_server_error("Failed to hash password"))?;

    let new_user = CreateUserDTO {
        username: body.username,
        email: body.email.filter(|e| !e.trim().is_empty()),
        password: password_hash,
    };

    let created_user = state.users.create(&new_user).await?;
    state.profiles.create_empty(&created_user.user_id).await?;

    info!(user_id = created_user.user_id, "User registered");
    Ok((StatusCode::CREATED, Json(UserDTO::from(created_user))))
}
