// Timestamp domain model
use chrono::{DateTime, Duration, FixedOffset, Local};
use serde::{Serialize, Serializer};
use std::fmt;

/// Display format shared by history and forecast axes.
pub const LABEL_FORMAT: &str = "%H:%M:%S";

/// Wall-clock instant with its UTC offset. Ordering follows the absolute
/// instant, so projections past midnight or across a daylight-saving change
/// stay ordered even though the label only shows the local time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<FixedOffset>);

impl Timestamp {
    pub fn new(datetime: DateTime<FixedOffset>) -> Self {
        Self(datetime)
    }

    pub fn now() -> Self {
        Self(Local::now().fixed_offset())
    }

    pub fn plus_hours(&self, hours: i64) -> Self {
        Self(self.0 + Duration::hours(hours))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(LABEL_FORMAT))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
