// Database models (internal, may differ from public DTOs)

use calendar_core::{EventFields, TimeRange};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

// ============================================
// Event models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub all_day: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventRow {
    pub fn time_range(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateEventRow {
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub all_day: bool,
}

impl From<EventFields> for CreateEventRow {
    fn from(fields: EventFields) -> Self {
        Self {
            title: fields.title,
            description: fields.description,
            start_time: fields.time.start,
            end_time: fields.time.end,
            all_day: fields.all_day,
        }
    }
}

/// Full replacement of the mutable columns. Merging with the existing row
/// happens in the service layer before this is built.
#[derive(Debug, Clone)]
pub struct UpdateEventRow {
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub all_day: bool,
}

impl From<EventFields> for UpdateEventRow {
    fn from(fields: EventFields) -> Self {
        Self {
            title: fields.title,
            description: fields.description,
            start_time: fields.time.start,
            end_time: fields.time.end,
            all_day: fields.all_day,
        }
    }
}
