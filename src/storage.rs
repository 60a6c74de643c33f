//! Typed access to the per-user key/value store
//!
//! Documents are stored as JSON text under fixed keys. A document that no
//! longer decodes is treated as absent so a bad blob never locks a user out.

use crate::entities::{ActiveRoadmap, ChatSession};
use crate::repositories::LocalStorageRepository;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub const ACTIVE_ROADMAP_KEY: &str = "active_roadmap";
pub const CHAT_SESSIONS_KEY: &str = "chat_sessions";

/// Reads and decodes the document under `key`
pub async fn load_json<T: DeserializeOwned>(
    storage: &LocalStorageRepository,
    user_id: &i64,
    key: &str,
) -> Result<Option<T>, sqlx::Error> {
    let Some(raw) = storage.get_item(user_id, key).await? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(user_id, key, "Stored document does not decode, ignoring it: {}", e);
            Ok(None)
        }
    }
}

/// Encodes `value` and overwrites the document under `key`
pub async fn save_json<T: Serialize>(
    storage: &LocalStorageRepository,
    user_id: &i64,
    key: &str,
    value: &T,
) -> Result<(), crate::core::AppError> {
    let raw = serde_json::to_string(value)?;
    debug!(user_id, key, bytes = raw.len(), "Saving document");
    storage.set_item(user_id, key, &raw).await?;
    Ok(())
}

pub async fn load_sessions(
    storage: &LocalStorageRepository,
    user_id: &i64,
) -> Result<Vec<ChatSession>, sqlx::Error> {
    Ok(load_json(storage, user_id, CHAT_SESSIONS_KEY)
        .await?
        .unwrap_or_default())
}

pub async fn save_sessions(
    storage: &LocalStorageRepository,
    user_id: &i64,
    sessions: &[ChatSession],
) -> Result<(), crate::core::AppError> {
    save_json(storage, user_id, CHAT_SESSIONS_KEY, &sessions).await
}

pub async fn load_active_roadmap(
    storage: &LocalStorageRepository,
    user_id: &i64,
) -> Result<Option<ActiveRoadmap>, sqlx::Error> {
    load_json(storage, user_id, ACTIVE_ROADMAP_KEY).await
}

pub async fn save_active_roadmap(
    storage: &LocalStorageRepository,
    user_id: &i64,
    active: &ActiveRoadmap,
) -> Result<(), crate::core::AppError> {
    save_json(storage, user_id, ACTIVE_ROADMAP_KEY, active).await
}
