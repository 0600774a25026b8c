use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::user::User;
use crate::infra::store::UserStore;

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        self.store.get_user(user_id).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.store.list_users().await
    }
}
