//! Elapsed-time rendering.
//!
//! Durations are cascaded through fixed-length units (365-day years, 30-day months),
//! so the output is an approximation and never consults a calendar.

use std::str::FromStr;

use time::OffsetDateTime;

use crate::domain::time_of_day::LOCAL_OFFSET;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    En,
    Vi,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "vi" => Ok(Self::Vi),
            other => Err(format!("unsupported locale: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Largest first.
const UNITS: [(Unit, i64); 7] = [
    (Unit::Year, 365 * DAY),
    (Unit::Month, 30 * DAY),
    (Unit::Week, 7 * DAY),
    (Unit::Day, DAY),
    (Unit::Hour, HOUR),
    (Unit::Minute, MINUTE),
    (Unit::Second, 1),
];

impl Unit {
    fn name(self, locale: Locale, count: i64) -> &'static str {
        match locale {
            Locale::Vi => match self {
                Unit::Year => "năm",
                Unit::Month => "tháng",
                Unit::Week => "tuần",
                Unit::Day => "ngày",
                Unit::Hour => "giờ",
                Unit::Minute => "phút",
                Unit::Second => "giây",
            },
            Locale::En => {
                let plural = count != 1;
                match (self, plural) {
                    (Unit::Year, false) => "year",
                    (Unit::Year, true) => "years",
                    (Unit::Month, false) => "month",
                    (Unit::Month, true) => "months",
                    (Unit::Week, false) => "week",
                    (Unit::Week, true) => "weeks",
                    (Unit::Day, false) => "day",
                    (Unit::Day, true) => "days",
                    (Unit::Hour, false) => "hour",
                    (Unit::Hour, true) => "hours",
                    (Unit::Minute, false) => "minute",
                    (Unit::Minute, true) => "minutes",
                    (Unit::Second, false) => "second",
                    (Unit::Second, true) => "seconds",
                }
            }
        }
    }

    fn render(self, locale: Locale, count: i64) -> String {
        format!("{} {}", count, self.name(locale, count))
    }
}

/// Renders the time from `start` to `end` as the largest nonzero unit plus the
/// unit directly below it when that one is nonzero. `end <= start` yields zero seconds.
pub fn humanize_elapsed(start: OffsetDateTime, end: OffsetDateTime, locale: Locale) -> String {
    let mut remaining = (end - start).whole_seconds();
    if remaining <= 0 {
        return Unit::Second.render(locale, 0);
    }

    let mut counts = [0i64; UNITS.len()];
    for (slot, (_, seconds)) in counts.iter_mut().zip(UNITS.iter()) {
        *slot = remaining / seconds;
        remaining %= seconds;
    }

    let Some(lead) = counts.iter().position(|count| *count > 0) else {
        return Unit::Second.render(locale, 0);
    };

    let mut text = UNITS[lead].0.render(locale, counts[lead]);
    if let Some(&next) = counts.get(lead + 1) {
        if next > 0 {
            text.push(' ');
            text.push_str(&UNITS[lead + 1].0.render(locale, next));
        }
    }
    text
}

const WEEKDAYS_VI: [&str; 7] = [
    "Chủ Nhật", "Thứ 2", "Thứ 3", "Thứ 4", "Thứ 5", "Thứ 6", "Thứ 7",
];

/// `HH:MM <weekday>, DD/MM/YYYY` on the local clock, with Vietnamese weekday names.
pub fn format_local_date_time(instant: OffsetDateTime) -> String {
    let local = instant.to_offset(LOCAL_OFFSET);
    let weekday = WEEKDAYS_VI[local.weekday().number_days_from_sunday() as usize];
    format!(
        "{:02}:{:02} {}, {:02}/{:02}/{}",
        local.hour(),
        local.minute(),
        weekday,
        local.day(),
        u8::from(local.month()),
        local.year()
    )
}
