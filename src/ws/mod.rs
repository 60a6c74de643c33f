//! WebSocket Module - live notification push
//!
//! - HTTP -> WebSocket upgrade for authenticated users
//! - one writer task and one listener task per connection
//! - `UserMap`, the registry services use to reach online users

pub mod connection;
pub mod usermap;

pub use connection::handle_socket;
pub use usermap::{InternalSignal, UserMap};

use crate::{AppState, entities::User};
use axum::{
    Extension,
    extract::{State, ws::WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;

/// Idle time after which the server drops a silent connection
pub const TIMEOUT_DURATION_SECONDS: u64 = 600;
/// Minimum spacing between two processed client frames
pub const RATE_LIMITER_MILLIS: u64 = 100;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Response {
    let user_id = current_user.user_id;
    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
}
