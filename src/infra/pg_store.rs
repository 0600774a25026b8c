use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::Row;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::post::{Post, PostDraft};
use crate::domain::time_record::{TimeRecord, REFERENCE_KEY};
use crate::domain::user::{User, UserCredentials};
use crate::infra::db::Db;
use crate::infra::store::{Health, PostStore, TimeStore, UserStore};

const POST_COLUMNS: &str = "id, date_time, description, duration, created_at, updated_at";
const TIME_COLUMNS: &str = "id, date_time, created_at, updated_at";
const USER_COLUMNS: &str = "id, email, name, created_at";

#[derive(Clone)]
pub struct PgStore {
    db: Db,
}

impl PgStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

fn post_from_row(row: &PgRow) -> Post {
    Post {
        id: row.get("id"),
        date_time: row.get("date_time"),
        description: row.get("description"),
        duration: row.get("duration"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn time_from_row(row: &PgRow) -> TimeRecord {
    TimeRecord {
        id: row.get("id"),
        date_time: row.get("date_time"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    }
}

fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '%' | '_' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[async_trait]
impl PostStore for PgStore {
    async fn insert_post(&self, draft: &PostDraft) -> Result<Post> {
        let row = sqlx::query(&format!(
            "INSERT INTO posts (date_time, description, duration) \
             VALUES ($1, $2, $3) \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(draft.date_time)
        .bind(&draft.description)
        .bind(&draft.duration)
        .fetch_one(self.db.pool())
        .await?;

        Ok(post_from_row(&row))
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>> {
        let row = sqlx::query(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(post_from_row))
    }

    async fn replace_post(&self, id: Uuid, draft: &PostDraft) -> Result<Option<Post>> {
        let row = sqlx::query(&format!(
            "UPDATE posts \
             SET date_time = $2, description = $3, duration = $4, updated_at = now() \
             WHERE id = $1 \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(id)
        .bind(draft.date_time)
        .bind(&draft.description)
        .bind(&draft.duration)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(post_from_row))
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(&self, description: Option<&str>) -> Result<Vec<Post>> {
        let rows = match description {
            Some(description) => {
                let pattern = format!("%{}%", escape_like_pattern(description));
                sqlx::query(&format!(
                    "SELECT {POST_COLUMNS} FROM posts \
                     WHERE description ILIKE $1 ESCAPE '\\' \
                     ORDER BY created_at, id"
                ))
                .bind(pattern)
                .fetch_all(self.db.pool())
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at, id"
                ))
                .fetch_all(self.db.pool())
                .await?
            }
        };

        Ok(rows.iter().map(post_from_row).collect())
    }
}

#[async_trait]
impl TimeStore for PgStore {
    async fn reference_time(&self) -> Result<Option<TimeRecord>> {
        let row = sqlx::query(&format!("SELECT {TIME_COLUMNS} FROM times WHERE key = $1"))
            .bind(REFERENCE_KEY)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(time_from_row))
    }

    async fn create_reference_time(&self, date_time: OffsetDateTime) -> Result<Option<TimeRecord>> {
        let row = sqlx::query(&format!(
            "INSERT INTO times (key, date_time) VALUES ($1, $2) \
             ON CONFLICT (key) DO NOTHING \
             RETURNING {TIME_COLUMNS}"
        ))
        .bind(REFERENCE_KEY)
        .bind(date_time)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(time_from_row))
    }

    async fn update_time(&self, id: Uuid, date_time: OffsetDateTime) -> Result<Option<TimeRecord>> {
        let row = sqlx::query(&format!(
            "UPDATE times SET date_time = $2, updated_at = now() \
             WHERE id = $1 \
             RETURNING {TIME_COLUMNS}"
        ))
        .bind(id)
        .bind(date_time)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(time_from_row))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, email: &str, name: &str, password_hash: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "INSERT INTO users (email, name, password_hash) VALUES ($1, $2, $3) \
             ON CONFLICT DO NOTHING \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<UserCredentials>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|row| UserCredentials {
            user: user_from_row(&row),
            password_hash: row.get("password_hash"),
        }))
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id"))
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.iter().map(user_from_row).collect())
    }
}

#[async_trait]
impl Health for PgStore {
    async fn ping(&self) -> Result<()> {
        self.db.ping().await
    }
}
