//! Entities module - domain entities
//!
//! Relational entities map one-to-one to tables. `Roadmap` and `ChatSession`
//! are JSON documents kept in the key/value store.

pub mod blog;
pub mod chat_session;
pub mod enums;
pub mod follow;
pub mod learning_profile;
pub mod notification;
pub mod profile;
pub mod roadmap;
pub mod topic;
pub mod user;

// Re-exports
pub use blog::{AuthoredBlog, AuthoredComment, Blog, Comment};
pub use chat_session::{ChatMessage, ChatSession, DEFAULT_SESSION_TITLE};
pub use enums::{Difficulty, ExperienceLevel, NotificationKind};
pub use follow::Follow;
pub use learning_profile::LearningProfile;
pub use notification::Notification;
pub use profile::{Profile, UserSummary};
pub use roadmap::{ActiveRoadmap, Chapter, Roadmap, RoadmapRecord, RoadmapStep, Section, StepDetails};
pub use topic::{AuthoredReply, Topic, TopicReply, TopicSummary};
pub use user::User;
