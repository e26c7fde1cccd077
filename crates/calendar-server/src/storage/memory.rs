// In-memory storage implementation for dev mode
// Decision: Use parking_lot for thread-safe access
// Decision: UUIDs generated via uuid v7 (time-ordered)
//
// This implementation provides the same API and ordering as the PostgreSQL
// repository, backed by a HashMap. Data is lost on restart.

use anyhow::Result;
use calendar_core::TimeRange;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::models::*;

/// In-memory database for dev mode and tests
#[derive(Default)]
pub struct InMemoryDatabase {
    events: RwLock<HashMap<Uuid, EventRow>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    /// Matches `ORDER BY start_time ASC, id ASC`
    fn sort_rows(rows: &mut [EventRow]) {
        rows.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEventRow) -> Result<EventRow> {
        let now = Self::now();
        let id = Uuid::now_v7();
        let row = EventRow {
            id,
            title: input.title,
            description: input.description,
            start_time: input.start_time,
            end_time: input.end_time,
            all_day: input.all_day,
            created_at: now,
            updated_at: now,
        };
        self.events.write().insert(id, row.clone());
        Ok(row)
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        Ok(self.events.read().get(&id).cloned())
    }

    pub async fn list_events(&self, range: Option<TimeRange>) -> Result<Vec<EventRow>> {
        let mut rows: Vec<EventRow> = self
            .events
            .read()
            .values()
            .filter(|e| range.map_or(true, |r| e.time_range().overlaps(&r)))
            .cloned()
            .collect();
        Self::sort_rows(&mut rows);
        Ok(rows)
    }

    pub async fn find_overlapping_event(
        &self,
        range: TimeRange,
        exclude_id: Option<Uuid>,
    ) -> Result<Option<EventRow>> {
        Ok(self
            .events
            .read()
            .values()
            .filter(|e| Some(e.id) != exclude_id)
            .filter(|e| e.time_range().overlaps(&range))
            .min_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)))
            .cloned())
    }

    pub async fn update_event(&self, id: Uuid, input: UpdateEventRow) -> Result<Option<EventRow>> {
        let mut events = self.events.write();
        if let Some(event) = events.get_mut(&id) {
            event.title = input.title;
            event.description = input.description;
            event.start_time = input.start_time;
            event.end_time = input.end_time;
            event.all_day = input.all_day;
            event.updated_at = Self::now();
            return Ok(Some(event.clone()));
        }
        Ok(None)
    }

    pub async fn delete_event(&self, id: Uuid) -> Result<bool> {
        Ok(self.events.write().remove(&id).is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}
