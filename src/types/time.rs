use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::TimeFormatError;

/// 2024-12-25T06:00:00Z, used when neither an override nor the trace has a time.
const DEFAULT_ANCHOR_SECS: i64 = 1_735_106_400;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

pub fn default_anchor() -> DateTime<Utc> {
    DateTime::from_timestamp(DEFAULT_ANCHOR_SECS, 0).unwrap_or_default()
}

/// Parses RFC 3339 or one of the naive forms; naive times are taken as UTC.
pub fn parse_time(s: &str) -> Result<DateTime<Utc>, TimeFormatError> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TimeFormatError::Unrecognized(s.to_string()))
}

/// TCX timestamp: UTC with millisecond precision.
pub fn format_time(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
