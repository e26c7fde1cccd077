// Event domain types
//
// These types represent the Event entity and the validated inputs used to
// create and update it. Used by both the server and the CLI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::error::{EventError, Result};
use crate::time_range::TimeRange;
use crate::timestamp::parse_timestamp;

/// A titled time interval `[start_time, end_time)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    #[cfg_attr(feature = "openapi", schema(example = "Standup"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Carried for clients; not interpreted by the store.
    #[serde(default)]
    pub all_day: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn time_range(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }

    pub fn overlaps(&self, range: &TimeRange) -> bool {
        self.time_range().overlaps(range)
    }
}

/// Advisory report that a written event intersects another one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapWarning {
    pub overlapping_id: Uuid,
    pub overlapping_title: String,
}

/// Result of a successful create or update
#[derive(Debug, Clone)]
pub struct EventWrite {
    pub event: Event,
    /// At most one overlapping event is reported, never a list.
    pub overlap: Option<OverlapWarning>,
}

/// Fully validated field set for a stored event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFields {
    pub title: String,
    pub description: String,
    pub time: TimeRange,
    pub all_day: bool,
}

impl EventFields {
    /// Validate raw create input.
    ///
    /// Title and both timestamps are required; the interval must be non-empty.
    pub fn parse(
        title: Option<&str>,
        description: Option<&str>,
        start_time: Option<&str>,
        end_time: Option<&str>,
        all_day: Option<bool>,
    ) -> Result<Self> {
        let title = validate_title(title.unwrap_or_default())?;
        let start = required_timestamp("startTime", start_time)?;
        let end = required_timestamp("endTime", end_time)?;

        Ok(Self {
            title,
            description: description.unwrap_or_default().to_string(),
            time: TimeRange::new(start, end)?,
            all_day: all_day.unwrap_or(false),
        })
    }
}

/// Partial update. `None` keeps the existing value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub all_day: Option<bool>,
}

impl EventPatch {
    /// Validate raw update input field by field.
    ///
    /// A supplied title must be non-empty and a supplied timestamp must parse.
    /// Empty timestamp strings count as omitted.
    pub fn parse(
        title: Option<&str>,
        description: Option<&str>,
        start_time: Option<&str>,
        end_time: Option<&str>,
        all_day: Option<bool>,
    ) -> Result<Self> {
        Ok(Self {
            title: title.map(validate_title).transpose()?,
            description: description.map(str::to_string),
            start_time: optional_timestamp("startTime", start_time)?,
            end_time: optional_timestamp("endTime", end_time)?,
            all_day,
        })
    }

    /// Merge onto an existing event and re-check the interval.
    pub fn merge(&self, existing: &Event) -> Result<EventFields> {
        let start = self.start_time.unwrap_or(existing.start_time);
        let end = self.end_time.unwrap_or(existing.end_time);

        Ok(EventFields {
            title: self.title.clone().unwrap_or_else(|| existing.title.clone()),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| existing.description.clone()),
            time: TimeRange::new(start, end)?,
            all_day: self.all_day.unwrap_or(existing.all_day),
        })
    }
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(EventError::validation("title is required"));
    }
    Ok(title.to_string())
}

fn required_timestamp(field: &str, value: Option<&str>) -> Result<DateTime<Utc>> {
    optional_timestamp(field, value)?
        .ok_or_else(|| EventError::validation(format!("{} is required", field)))
}

fn optional_timestamp(field: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_timestamp(raw)
            .map(Some)
            .ok_or_else(|| EventError::validation(format!("{} is not a valid timestamp", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, 0).unwrap()
    }

    fn standup() -> Event {
        Event {
            id: Uuid::now_v7(),
            title: "Standup".to_string(),
            description: "daily".to_string(),
            start_time: at(9, 0),
            end_time: at(9, 30),
            all_day: false,
            created_at: at(8, 0),
            updated_at: at(8, 0),
        }
    }

    #[test]
    fn test_parse_create_input() {
        let fields = EventFields::parse(
            Some("Standup"),
            None,
            Some("2024-01-01T09:00Z"),
            Some("2024-01-01T09:30Z"),
            None,
        )
        .unwrap();

        assert_eq!(fields.title, "Standup");
        assert_eq!(fields.description, "");
        assert_eq!(fields.time, TimeRange::new(at(9, 0), at(9, 30)).unwrap());
        assert!(!fields.all_day);
    }

    #[test]
    fn test_parse_create_requires_title() {
        let err = EventFields::parse(
            None,
            None,
            Some("2024-01-01T09:00Z"),
            Some("2024-01-01T09:30Z"),
            None,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "title is required");

        let err = EventFields::parse(
            Some("   "),
            None,
            Some("2024-01-01T09:00Z"),
            Some("2024-01-01T09:30Z"),
            None,
        )
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_parse_create_requires_timestamps() {
        let err = EventFields::parse(Some("x"), None, None, Some("2024-01-01T09:30Z"), None)
            .unwrap_err();
        assert_eq!(err.to_string(), "startTime is required");

        let err = EventFields::parse(Some("x"), None, Some("2024-01-01T09:00Z"), Some("soon"), None)
            .unwrap_err();
        assert_eq!(err.to_string(), "endTime is not a valid timestamp");
    }

    #[test]
    fn test_parse_create_rejects_empty_and_inverted_interval() {
        let same = EventFields::parse(
            Some("x"),
            None,
            Some("2024-01-01T09:00Z"),
            Some("2024-01-01T09:00Z"),
            None,
        );
        assert!(same.unwrap_err().is_validation());

        let inverted = EventFields::parse(
            Some("x"),
            None,
            Some("2024-01-01T10:00Z"),
            Some("2024-01-01T09:00Z"),
            None,
        );
        assert!(inverted.unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_create_rejects_sub_microsecond_interval() {
        // Both bounds collapse to 09:00:00 at storage precision
        let err = EventFields::parse(
            Some("x"),
            None,
            Some("2024-01-01T09:00:00.0000001Z"),
            Some("2024-01-01T09:00:00.0000009Z"),
            None,
        )
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_empty_patch_keeps_everything() {
        let existing = standup();
        let merged = EventPatch::default().merge(&existing).unwrap();

        assert_eq!(merged.title, existing.title);
        assert_eq!(merged.description, existing.description);
        assert_eq!(merged.time, existing.time_range());
        assert_eq!(merged.all_day, existing.all_day);
    }

    #[test]
    fn test_patch_end_only_is_checked_against_existing_start() {
        let existing = standup();

        let patch = EventPatch::parse(None, None, None, Some("2024-01-01T09:10Z"), None).unwrap();
        let merged = patch.merge(&existing).unwrap();
        assert_eq!(merged.time, TimeRange::new(at(9, 0), at(9, 10)).unwrap());

        let patch = EventPatch::parse(None, None, None, Some("2024-01-01T08:00Z"), None).unwrap();
        assert!(patch.merge(&existing).unwrap_err().is_validation());
    }

    #[test]
    fn test_patch_parse_validation() {
        assert!(EventPatch::parse(Some(""), None, None, None, None)
            .unwrap_err()
            .is_validation());
        assert!(EventPatch::parse(None, None, Some("never"), None, None)
            .unwrap_err()
            .is_validation());

        // Empty timestamp strings are treated as omitted
        let patch = EventPatch::parse(None, None, Some(""), Some(""), None).unwrap();
        assert_eq!(patch, EventPatch::default());
    }

    #[test]
    fn test_patch_description_can_be_cleared() {
        let existing = standup();
        let patch = EventPatch::parse(None, Some(""), None, None, Some(true)).unwrap();
        let merged = patch.merge(&existing).unwrap();
        assert_eq!(merged.description, "");
        assert!(merged.all_day);
    }

    #[test]
    fn test_event_json_uses_camel_case() {
        let event = standup();
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["title"], "Standup");
        assert!(json["startTime"].is_string());
        assert!(json["endTime"].is_string());
        assert_eq!(json["allDay"], false);
        assert!(json.get("start_time").is_none());
    }
}
