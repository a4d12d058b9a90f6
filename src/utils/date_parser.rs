use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

use crate::error::ConfigError;

static RELATIVE_DATE_REGEX: OnceLock<Regex> = OnceLock::new();

fn relative_date_regex() -> &'static Regex {
    RELATIVE_DATE_REGEX.get_or_init(|| {
        Regex::new(r"^(\d+)(mo|w|d|h)$").expect("Failed to compile relative date regex")
    })
}

fn date_error(input: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::DateParseError {
        input: input.to_string(),
        message: message.into(),
    }
}

/// Parses a point in time for `--since` and `--as-of`.
///
/// Accepts a relative offset back from now (`3mo`, `2w`, `5d`, `12h`; a month
/// counts as 30 days), an RFC 3339 timestamp, or a UTC date / date-time
/// (`2025-07-01`, `2025-07-01 12:00:00`).
pub fn parse_point_in_time(input: &str) -> Result<DateTime<Utc>, ConfigError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(date_error(input, "empty date"));
    }

    if let Some(caps) = relative_date_regex().captures(input) {
        let amount: i64 = caps[1]
            .parse()
            .map_err(|_| date_error(input, "number out of range"))?;
        let offset = match &caps[2] {
            "mo" => Duration::try_days(amount.saturating_mul(30)),
            "w" => Duration::try_weeks(amount),
            "d" => Duration::try_days(amount),
            _ => Duration::try_hours(amount),
        }
        .ok_or_else(|| date_error(input, "offset out of range"))?;
        return Utc::now()
            .checked_sub_signed(offset)
            .ok_or_else(|| date_error(input, "offset out of range"));
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(date_error(
        input,
        "expected e.g. 2w, 3d, 2025-07-01 or 2025-07-01T12:00:00Z",
    ))
}
