//! DTOs module - Data Transfer Objects
//!
//! DTOs separate the API representation from the entities. Request bodies
//! are `*RequestDTO` or plain `*DTO` with validation; `Create*DTO` without
//! the `Request` suffix are repository inputs built by the services.

pub mod blog;
pub mod chat;
pub mod dsa;
pub mod learning_profile;
pub mod notification;
pub mod query;
pub mod roadmap;
pub mod topic;
pub mod user;
pub mod ws_event;

// Re-exports
pub use blog::{
    BlogDTO, CommentDTO, CreateBlogDTO, CreateBlogRequestDTO, CreateCommentDTO,
    CreateCommentRequestDTO, UpdateBlogDTO,
};
pub use chat::{CreateSessionDTO, SendMessageDTO, SessionSummaryDTO};
pub use dsa::{CodeReviewDTO, DsaProblemDTO, GenerateProblemDTO, ProblemExample, ReviewRequestDTO};
pub use learning_profile::{LearningProfileDTO, UpsertLearningProfileDTO};
pub use notification::{CreateNotificationDTO, NotificationDTO, ReadAllDTO, UnreadCountDTO};
pub use query::{BlogQuery, NotificationsQuery, TopicQuery, UserSearchQuery};
pub use roadmap::{CreateRoadmapDTO, GenerateRoadmapDTO, RoadmapDTO};
pub use topic::{
    CreateReplyDTO, CreateReplyRequestDTO, CreateTopicDTO, CreateTopicRequestDTO, ReplyDTO,
    TopicDTO, TopicDetailDTO,
};
pub use user::{ChangePasswordDTO, CreateUserDTO, LoginDTO, ProfileDTO, UpdateProfileDTO, UserDTO};
pub use ws_event::{WsClientEventDTO, WsEventDTO};
