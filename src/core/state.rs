//! Application State - shared state of the application
//!
//! Holds every repository, the completion client and the registry of
//! users connected over WebSocket.

use crate::core::config::LlmSettings;
use crate::llm::{CompletionClient, GroqClient, LlmError};
use crate::repositories::{
    BlogRepository, CommentRepository, FollowRepository, LearningProfileRepository,
    LocalStorageRepository, NotificationRepository, ProfileRepository, RoadmapRepository,
    TopicRepository, UserRepository,
};
use crate::ws::usermap::UserMap;
use sqlx::SqlitePool;
use std::sync::Arc;

/// State shared across every route and middleware
pub struct AppState {
    /// Accounts and credentials
    pub users: UserRepository,

    /// Public profile data edited from the settings page
    pub profiles: ProfileRepository,

    pub follows: FollowRepository,

    pub blogs: BlogRepository,

    pub comments: CommentRepository,

    pub notifications: NotificationRepository,

    /// Community board topics and their replies
    pub topics: TopicRepository,

    pub learning_profiles: LearningProfileRepository,

    pub roadmaps: RoadmapRepository,

    /// Per-user key/value blobs (active roadmap, chat sessions)
    pub storage: LocalStorageRepository,

    /// Secret key for JWT tokens
    pub jwt_secret: String,

    /// Hosted completion endpoint used by the roadmap wizard, the DSA trainer and the assistant chat
    pub llm: Arc<dyn CompletionClient>,

    /// Users currently connected over WebSocket
    /// Key: user_id, Value: sender used to push notifications
    pub users_online: UserMap,
}

impl AppState {
    /// Creates the state with every repository on the given pool
    ///
    /// # Arguments
    /// * `pool` - Shared SQLite connection pool
    /// * `jwt_secret` - Key used to sign JWT tokens
    /// * `llm` - Completion client
    pub fn new(pool: SqlitePool, jwt_secret: String, llm: Arc<dyn CompletionClient>) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            profiles: ProfileRepository::new(pool.clone()),
            follows: FollowRepository::new(pool.clone()),
            blogs: BlogRepository::new(pool.clone()),
            comments: CommentRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool.clone()),
            topics: TopicRepository::new(pool.clone()),
            learning_profiles: LearningProfileRepository::new(pool.clone()),
            roadmaps: RoadmapRepository::new(pool.clone()),
            storage: LocalStorageRepository::new(pool),
            jwt_secret,
            llm,
            users_online: UserMap::new(),
        }
    }

    /// Same as [`AppState::new`] but builds the Groq client from settings
    pub fn with_groq(
        pool: SqlitePool,
        jwt_secret: String,
        settings: &LlmSettings,
    ) -> Result<Self, LlmError> {
        let client = GroqClient::new(settings.clone())?;
        Ok(Self::new(pool, jwt_secret, Arc::new(client)))
    }
}
