//! Storage contracts. Implemented by [`PgStore`](crate::infra::pg_store::PgStore)
//! and [`MemoryStore`](crate::infra::memory_store::MemoryStore).

use anyhow::Result;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::post::{Post, PostDraft};
use crate::domain::time_record::TimeRecord;
use crate::domain::user::{User, UserCredentials};

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn insert_post(&self, draft: &PostDraft) -> Result<Post>;

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>>;

    /// Replaces every user field of the post. `None` when the id is unknown.
    async fn replace_post(&self, id: Uuid, draft: &PostDraft) -> Result<Option<Post>>;

    async fn delete_post(&self, id: Uuid) -> Result<bool>;

    /// All posts in insertion order. `description` narrows the snapshot with a
    /// case-insensitive substring match when the backend can do so cheaply; callers
    /// must still apply the filter themselves.
    async fn list_posts(&self, description: Option<&str>) -> Result<Vec<Post>>;
}

#[async_trait]
pub trait TimeStore: Send + Sync {
    /// The reference time, looked up by its fixed key.
    async fn reference_time(&self) -> Result<Option<TimeRecord>>;

    /// Creates the reference time. `None` when one already exists.
    async fn create_reference_time(&self, date_time: OffsetDateTime) -> Result<Option<TimeRecord>>;

    async fn update_time(&self, id: Uuid, date_time: OffsetDateTime) -> Result<Option<TimeRecord>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// `None` when the email is already registered.
    async fn insert_user(&self, email: &str, name: &str, password_hash: &str) -> Result<Option<User>>;

    async fn find_credentials(&self, email: &str) -> Result<Option<UserCredentials>>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    async fn list_users(&self) -> Result<Vec<User>>;
}

/// Liveness of the backing storage.
#[async_trait]
pub trait Health: Send + Sync {
    async fn ping(&self) -> Result<()>;
}
