pub mod app;
pub mod config;
pub mod domain;
pub mod http;
pub mod infra;

use anyhow::Result;
use std::sync::Arc;

use crate::app::humanize::Locale;
use crate::config::{AppConfig, StorageBackend};
use crate::infra::db::Db;
use crate::infra::memory_store::MemoryStore;
use crate::infra::pg_store::PgStore;
use crate::infra::store::{Health, PostStore, TimeStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
    pub times: Arc<dyn TimeStore>,
    pub users: Arc<dyn UserStore>,
    pub health: Arc<dyn Health>,
    pub paseto_access_key: [u8; 32],
    pub access_ttl_minutes: u64,
    pub default_locale: Locale,
}

impl AppState {
    /// Wires every store handle to the same backend.
    pub fn with_store<S>(store: Arc<S>, config: &AppConfig) -> Self
    where
        S: PostStore + TimeStore + UserStore + Health + 'static,
    {
        Self {
            posts: store.clone(),
            times: store.clone(),
            users: store.clone(),
            health: store,
            paseto_access_key: config.paseto_access_key,
            access_ttl_minutes: config.access_ttl_minutes,
            default_locale: config.default_locale,
        }
    }

    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        match config.storage {
            StorageBackend::Postgres => {
                let db = Db::connect(config).await?;
                if config.run_migrations {
                    db.migrate().await?;
                    tracing::info!("database migrations applied");
                }
                Ok(Self::with_store(Arc::new(PgStore::new(db)), config))
            }
            StorageBackend::Memory => {
                tracing::warn!("using in-memory storage; data is lost on restart");
                Ok(Self::with_store(Arc::new(MemoryStore::new()), config))
            }
        }
    }
}
