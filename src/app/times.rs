use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::app::humanize::{format_local_date_time, humanize_elapsed, Locale};
use crate::domain::time_record::TimeRecord;
use crate::infra::store::TimeStore;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Elapsed {
    #[serde(with = "time::serde::rfc3339")]
    pub date_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub now: OffsetDateTime,
    pub elapsed: String,
    pub display: String,
}

#[derive(Clone)]
pub struct TimeService {
    store: Arc<dyn TimeStore>,
}

impl TimeService {
    pub fn new(store: Arc<dyn TimeStore>) -> Self {
        Self { store }
    }

    /// Zero or one record, for clients that expect a collection.
    pub async fn list_times(&self) -> Result<Vec<TimeRecord>> {
        Ok(self.store.reference_time().await?.into_iter().collect())
    }

    pub async fn create_time(&self, date_time: OffsetDateTime) -> Result<Option<TimeRecord>> {
        self.store.create_reference_time(date_time).await
    }

    pub async fn update_time(&self, time_id: Uuid, date_time: OffsetDateTime) -> Result<Option<TimeRecord>> {
        self.store.update_time(time_id, date_time).await
    }

    pub async fn elapsed(&self, now: OffsetDateTime, locale: Locale) -> Result<Option<Elapsed>> {
        let Some(record) = self.store.reference_time().await? else {
            return Ok(None);
        };

        Ok(Some(Elapsed {
            date_time: record.date_time,
            now,
            elapsed: humanize_elapsed(record.date_time, now, locale),
            display: format_local_date_time(record.date_time),
        }))
    }
}
