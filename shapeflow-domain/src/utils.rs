// Time parsing and window helpers

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Fallback range bounds used when the working table is empty.
pub const DEFAULT_MIN_DATE: (i32, u32, u32) = (2024, 4, 21);
pub const DEFAULT_MAX_DATE: (i32, u32, u32) = (2024, 7, 21);

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d-%m-%Y %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d-%m-%Y"];

/// Lenient timestamp parser for event `Time` values and query bounds.
/// Returns `None` for anything unparsable; callers drop such rows.
pub fn parse_event_time(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
        }
    }
    None
}

/// Parses a short offset string ("30s", "5min", "1h", "2d").
pub fn parse_offset(value: &str) -> Result<Duration> {
    let trimmed = value.trim().to_lowercase();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| anyhow!("offset '{}' has no unit", value))?;
    let (digits, unit) = trimmed.split_at(split);
    let amount: i64 = digits
        .parse()
        .map_err(|_| anyhow!("offset '{}' has no magnitude", value))?;
    if amount <= 0 {
        return Err(anyhow!("offset '{}' must be positive", value));
    }
    match unit {
        "s" | "sec" => Ok(Duration::seconds(amount)),
        "min" | "t" => Ok(Duration::minutes(amount)),
        "h" | "hr" => Ok(Duration::hours(amount)),
        "d" | "day" => Ok(Duration::days(amount)),
        _ => Err(anyhow!("unknown offset unit '{}'", unit)),
    }
}

/// Floors a timestamp to the start of its window, with windows aligned to
/// the Unix epoch.
pub fn floor_to_window(timestamp: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    let window_secs = window.num_seconds().max(1);
    let floored = timestamp.timestamp().div_euclid(window_secs) * window_secs;
    Utc.timestamp_opt(floored, 0)
        .single()
        .unwrap_or(timestamp)
}

/// Alert time rendering: window start as `%H:%M:%S %d-%m-%Y`.
pub fn format_window_start(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%H:%M:%S %d-%m-%Y").to_string()
}

/// English weekday name ("Monday" .. "Sunday").
pub fn weekday_name(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%A").to_string()
}

pub fn default_min_date() -> DateTime<Utc> {
    from_ymd(DEFAULT_MIN_DATE)
}

pub fn default_max_date() -> DateTime<Utc> {
    from_ymd(DEFAULT_MAX_DATE)
}

fn from_ymd((year, month, day): (i32, u32, u32)) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
