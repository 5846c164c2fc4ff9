use chrono::{DateTime, Utc};

/// Wall-clock time of day, e.g. `22:13:20`.
#[must_use]
pub fn format_time_of_day(value: DateTime<Utc>) -> String {
    value.format("%H:%M:%S").to_string()
}
