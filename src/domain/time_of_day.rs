use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::macros::offset;
use time::{OffsetDateTime, UtcOffset};

/// Fixed offset that defines the "local" clock for bucketing, calendar filters and
/// display. This is an additive rule, not a timezone lookup.
pub const LOCAL_OFFSET: UtcOffset = offset!(+7);

/// Time-of-day bucket of an instant on the local clock.
///
/// Variants are declared in sort priority order, so the derived `Ord` is the
/// morning < noon < afternoon < evening ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Noon,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Noon,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
    ];

    pub fn of(instant: OffsetDateTime) -> Self {
        Self::from_local_hour(instant.to_offset(LOCAL_OFFSET).hour())
    }

    /// Buckets a local hour in `0..24`. Evening wraps across midnight.
    pub fn from_local_hour(hour: u8) -> Self {
        match hour {
            5..=10 => Self::Morning,
            11..=12 => Self::Noon,
            13..=16 => Self::Afternoon,
            _ => Self::Evening,
        }
    }

    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        Self::of(instant) == *self
    }

    pub fn priority(&self) -> u8 {
        match self {
            Self::Morning => 1,
            Self::Noon => 2,
            Self::Afternoon => 3,
            Self::Evening => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Noon => "noon",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
        }
    }

    pub fn label_vi(&self) -> &'static str {
        match self {
            Self::Morning => "Sáng",
            Self::Noon => "Trưa",
            Self::Afternoon => "Chiều",
            Self::Evening => "Tối",
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "morning" => Ok(Self::Morning),
            "noon" => Ok(Self::Noon),
            "afternoon" => Ok(Self::Afternoon),
            "evening" => Ok(Self::Evening),
            other => Err(format!("unknown time of day: {}", other)),
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
