use chrono::NaiveDateTime;

use crate::error::GachaError;

pub const PULL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a vendor pull time (`YYYY-MM-DD HH:MM:SS`) into epoch seconds. The
/// string carries no zone, it is read as UTC.
pub fn parse_pull_time(value: &str) -> Result<i64, GachaError> {
    NaiveDateTime::parse_from_str(value.trim(), PULL_TIME_FORMAT)
        .map(|time| time.and_utc().timestamp())
        .map_err(|_| GachaError::InvalidTimestamp(value.to_string()))
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}
