//! Repositories module - one repository per table
//!
//! Queries are runtime-checked (`query_as::<_, T>` with `FromRow`) so the
//! crate builds without a live database. The generic CRUD shape lives in
//! `traits`; anything that does not fit it is an inherent method.

pub mod blog;
pub mod comment;
pub mod follow;
pub mod learning_profile;
pub mod local_storage;
pub mod notification;
pub mod profile;
pub mod roadmap;
pub mod topic;
pub mod traits;
pub mod user;

/// Makes `%`, `_` and `\` match literally inside a `LIKE ... ESCAPE '\'` pattern
pub(crate) fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// Re-export traits
pub use traits::{Create, Delete, Read, Update};

// Re-export repository structs
pub use blog::BlogRepository;
pub use comment::CommentRepository;
pub use follow::FollowRepository;
pub use learning_profile::LearningProfileRepository;
pub use local_storage::LocalStorageRepository;
pub use notification::NotificationRepository;
pub use profile::ProfileRepository;
pub use roadmap::RoadmapRepository;
pub use topic::TopicRepository;
pub use user::UserRepository;

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::SqlitePool;
    use sqlx::sqlite::SqlitePoolOptions;

    /// Single-connection in-memory database with the schema applied
    pub async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await
            .expect("enable foreign keys");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("migrations");
        pool
    }
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
