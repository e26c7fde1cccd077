//! Lenient timestamp parsing for request inputs.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, TimeZone, Utc};

/// Naive date-time layouts accepted when no offset is given. Interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp string into UTC.
///
/// Accepts RFC 3339 (with or without seconds), naive date-times (taken as
/// UTC) and bare `YYYY-MM-DD` dates (UTC midnight). Returns `None` for empty
/// or unparseable input; callers decide whether that is an error.
///
/// Fractional seconds are truncated to microseconds, the precision Postgres
/// stores, so both storage backends compare the same instants.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    parse_utc(value).map(|dt| dt.trunc_subsecs(6))
}

fn parse_utc(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    // RFC 3339 without seconds, e.g. 2024-01-01T09:00Z or 2024-01-01T09:00+02:00
    if let Some(naive) = value.strip_suffix(&['Z', 'z'][..]) {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M") {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M%:z") {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
}
