//! Half-open time ranges and the overlap predicate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EventError, Result};
use crate::timestamp::parse_timestamp;

/// A half-open interval `[start, end)`.
///
/// Ranges built with [`TimeRange::new`] always satisfy `start < end`.
/// Query ranges coming from a list request are built with
/// [`TimeRange::from_query`] and are not checked; the overlap predicate is
/// applied to them as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Build a range for an event, rejecting empty and inverted bounds.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(EventError::validation("startTime must be before endTime"));
        }
        Ok(Self { start, end })
    }

    /// Build a query range from raw `start`/`end` parameters.
    ///
    /// Returns `None` unless both values are present and parseable; an
    /// unparseable bound is treated as absent rather than as an error.
    pub fn from_query(start: Option<&str>, end: Option<&str>) -> Option<Self> {
        let start = start.and_then(parse_timestamp)?;
        let end = end.and_then(parse_timestamp)?;
        Some(Self { start, end })
    }

    /// Strict half-open intersection: `self.start < other.end && self.end > other.start`.
    ///
    /// Ranges that only touch at an endpoint do not overlap. Both the range
    /// query and the write-time overlap check use this predicate; the SQL in
    /// the PostgreSQL backend mirrors it exactly.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && self.end > other.start
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}
