//! In-memory store used by the test suite and `STORAGE=memory`.
//! Data is lost on process restart.

use anyhow::Result;
use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::post::{Post, PostDraft};
use crate::domain::time_record::TimeRecord;
use crate::domain::user::{User, UserCredentials};
use crate::infra::store::{Health, PostStore, TimeStore, UserStore};

#[derive(Default)]
pub struct MemoryStore {
    posts: RwLock<Vec<Post>>,
    reference_time: RwLock<Option<TimeRecord>>,
    users: RwLock<Vec<UserCredentials>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn insert_post(&self, draft: &PostDraft) -> Result<Post> {
        let now = OffsetDateTime::now_utc();
        let post = Post {
            id: Uuid::new_v4(),
            date_time: draft.date_time,
            description: draft.description.clone(),
            duration: draft.duration.clone(),
            created_at: now,
            updated_at: now,
        };
        self.posts.write().await.push(post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|post| post.id == id).cloned())
    }

    async fn replace_post(&self, id: Uuid, draft: &PostDraft) -> Result<Option<Post>> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.iter_mut().find(|post| post.id == id) else {
            return Ok(None);
        };
        post.date_time = draft.date_time;
        post.description = draft.description.clone();
        post.duration = draft.duration.clone();
        post.updated_at = OffsetDateTime::now_utc();
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|post| post.id != id);
        Ok(posts.len() < before)
    }

    async fn list_posts(&self, description: Option<&str>) -> Result<Vec<Post>> {
        let needle = description.map(str::to_lowercase);
        let posts = self.posts.read().await;
        Ok(posts
            .iter()
            .filter(|post| match &needle {
                Some(needle) => post.description.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TimeStore for MemoryStore {
    async fn reference_time(&self) -> Result<Option<TimeRecord>> {
        Ok(self.reference_time.read().await.clone())
    }

    async fn create_reference_time(&self, date_time: OffsetDateTime) -> Result<Option<TimeRecord>> {
        let mut slot = self.reference_time.write().await;
        if slot.is_some() {
            return Ok(None);
        }
        let now = OffsetDateTime::now_utc();
        let record = TimeRecord {
            id: Uuid::new_v4(),
            date_time,
            created_at: now,
            updated_at: now,
        };
        *slot = Some(record.clone());
        Ok(Some(record))
    }

    async fn update_time(&self, id: Uuid, date_time: OffsetDateTime) -> Result<Option<TimeRecord>> {
        let mut slot = self.reference_time.write().await;
        match slot.as_mut() {
            Some(record) if record.id == id => {
                record.date_time = date_time;
                record.updated_at = OffsetDateTime::now_utc();
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, email: &str, name: &str, password_hash: &str) -> Result<Option<User>> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|existing| existing.user.email.eq_ignore_ascii_case(email))
        {
            return Ok(None);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(UserCredentials {
            user: user.clone(),
            password_hash: password_hash.to_string(),
        });
        Ok(Some(user))
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<UserCredentials>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|existing| existing.user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|existing| existing.user.id == id)
            .map(|existing| existing.user.clone()))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.iter().map(|existing| existing.user.clone()).collect())
    }
}

#[async_trait]
impl Health for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
