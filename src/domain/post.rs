use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::time_of_day::TimeOfDay;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub date_time: OffsetDateTime,
    pub description: String,
    pub duration: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Post {
    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::of(self.date_time)
    }
}

/// User-supplied fields of a post, used for both create and full replacement.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub date_time: OffsetDateTime,
    pub description: String,
    pub duration: String,
}

/// A post as returned by listings, with its computed bucket and the bucket's display label.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub time_of_day: TimeOfDay,
    pub time_of_day_label: &'static str,
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        let time_of_day = post.time_of_day();
        Self {
            post,
            time_of_day,
            time_of_day_label: time_of_day.label_vi(),
        }
    }
}
