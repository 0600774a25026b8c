use std::cmp::Ordering;

use serde::Serialize;
use time::Weekday;

use crate::domain::post::Post;
use crate::domain::time_of_day::{TimeOfDay, LOCAL_OFFSET};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    DateTime,
    TimeOfDay,
}

impl SortKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dateTime" => Some(Self::DateTime),
            "timeOfDay" => Some(Self::TimeOfDay),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// A validated listing request. `page` and `limit` are always at least 1.
#[derive(Debug, Clone)]
pub struct PostQuery {
    pub description: Option<String>,
    pub time_of_day: Option<TimeOfDay>,
    /// Local calendar month, 1 through 12.
    pub month: Option<u8>,
    /// Local weekday: 1 (Monday) through 6 (Saturday), 8 for Sunday.
    pub weekday: Option<u8>,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            description: None,
            time_of_day: None,
            month: None,
            weekday: None,
            sort_by: SortKey::DateTime,
            sort_order: SortOrder::Desc,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PostQuery {
    /// The description filter, with empty input treated as no filter.
    pub fn description_filter(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|value| !value.is_empty())
    }

    fn matches(&self, post: &Post, needle: Option<&str>) -> bool {
        if let Some(needle) = needle {
            if !post.description.to_lowercase().contains(needle) {
                return false;
            }
        }

        if let Some(bucket) = self.time_of_day {
            if !bucket.contains(post.date_time) {
                return false;
            }
        }

        if self.month.is_some() || self.weekday.is_some() {
            let local = post.date_time.to_offset(LOCAL_OFFSET);
            if let Some(month) = self.month {
                if u8::from(local.month()) != month {
                    return false;
                }
            }
            if let Some(weekday) = self.weekday {
                if weekday_number(local.weekday()) != weekday {
                    return false;
                }
            }
        }

        true
    }

    fn compare(&self, a: &Post, b: &Post) -> Ordering {
        let ordering = match self.sort_by {
            SortKey::DateTime => a.date_time.cmp(&b.date_time),
            SortKey::TimeOfDay => a.time_of_day().priority().cmp(&b.time_of_day().priority()),
        };
        match self.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Weekday numbering used by the calendar filter: Monday is 1, Saturday is 6, Sunday is 8.
pub fn weekday_number(weekday: Weekday) -> u8 {
    match weekday {
        Weekday::Sunday => 8,
        other => other.number_from_monday(),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub total_pages: usize,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}

/// Filters, sorts and paginates a snapshot of posts.
///
/// The sort is stable and the direction flips the comparator rather than the
/// output, so posts that compare equal keep their snapshot order either way.
pub fn run(posts: Vec<Post>, query: &PostQuery) -> Page<Post> {
    let needle = query.description_filter().map(str::to_lowercase);

    let mut matched: Vec<Post> = posts
        .into_iter()
        .filter(|post| query.matches(post, needle.as_deref()))
        .collect();
    matched.sort_by(|a, b| query.compare(a, b));

    let limit = query.limit.max(1) as usize;
    let page = query.page.max(1);
    let total = matched.len();
    let offset = (page as usize - 1).saturating_mul(limit);

    let data = matched.into_iter().skip(offset).take(limit).collect();

    Page {
        total,
        page,
        limit: limit as u32,
        total_pages: total.div_ceil(limit),
        data,
    }
}
