use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

use crate::app::query::{self, Page, PostQuery};
use crate::domain::post::{Post, PostDraft, PostView};
use crate::infra::store::PostStore;

#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn PostStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    pub async fn create_post(&self, draft: PostDraft) -> Result<Post> {
        self.store.insert_post(&draft).await
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        self.store.get_post(post_id).await
    }

    pub async fn update_post(&self, post_id: Uuid, draft: PostDraft) -> Result<Option<Post>> {
        self.store.replace_post(post_id, &draft).await
    }

    pub async fn delete_post(&self, post_id: Uuid) -> Result<bool> {
        self.store.delete_post(post_id).await
    }

    /// Bucket and calendar filters run in process over the description-narrowed snapshot.
    pub async fn list_posts(&self, query: &PostQuery) -> Result<Page<PostView>> {
        let snapshot = self.store.list_posts(query.description_filter()).await?;
        let scanned = snapshot.len();
        let page = query::run(snapshot, query);
        tracing::debug!(
            scanned,
            total = page.total,
            page = page.page,
            limit = page.limit,
            "listed posts"
        );
        Ok(page.map(PostView::from))
    }
}
