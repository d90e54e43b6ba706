//! Time source and geomessage timestamp format.

use chrono::{DateTime, Utc};

/// Timestamp layout used by `datetimesubmitted` / `datetimemodified`.
pub const GEOMESSAGE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Supplies the current UTC time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Render a timestamp in the geomessage layout (UTC, second precision).
pub fn format_geomessage_date(at: DateTime<Utc>) -> String {
    at.format(GEOMESSAGE_DATE_FORMAT).to_string()
}
