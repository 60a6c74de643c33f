//! CRUD shape shared by the SQLite repositories
//!
//! Not every repository implements all four traits: append-only tables such
//! as notifications have no `Update`, and rows keyed by the owning user
//! (profiles, learning profiles) are read with the user id as key.

/// Inserts a row built from `CreateDTO` and returns it with its generated key
pub trait Create<Entity, CreateDTO> {
    async fn create(&self, data: &CreateDTO) -> Result<Entity, sqlx::Error>;
}

/// Looks a row up by key, `Ok(None)` when absent
pub trait Read<Entity, Id> {
    async fn read(&self, id: &Id) -> Result<Option<Entity>, sqlx::Error>;
}

/// Applies a partial update where `None` fields keep their stored value
///
/// A missing row is reported as `sqlx::Error::RowNotFound`, which the HTTP
/// layer turns into a 404.
pub trait Update<Entity, UpdateDTO, Id> {
    async fn update(&self, id: &Id, data: &UpdateDTO) -> Result<Entity, sqlx::Error>;
}

/// Deletes by key. Returns whether a row matched; foreign keys cascade.
pub trait Delete<Id> {
    async fn delete(&self, id: &Id) -> Result<bool, sqlx::Error>;
}
