// Event service for business logic
//
// Owns the write-time overlap check and the range listing. Overlap is
// advisory: it is reported next to a successful write and never blocks it.
// The check and the write are separate storage calls and are not atomic.

use calendar_core::{
    Event, EventError, EventFields, EventPatch, EventWrite, OverlapWarning, Result, TimeRange,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::storage::{EventRow, StorageBackend};

pub struct EventService {
    db: Arc<StorageBackend>,
}

impl EventService {
    pub fn new(db: Arc<StorageBackend>) -> Self {
        Self { db }
    }

    /// Events ordered by start time; with a range, only those overlapping it.
    #[instrument(skip(self))]
    pub async fn list(&self, range: Option<TimeRange>) -> Result<Vec<Event>> {
        let rows = self.db.list_events(range).await.map_err(storage_error)?;
        Ok(rows.into_iter().map(Self::row_to_event).collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Event> {
        self.db
            .get_event(id)
            .await
            .map_err(storage_error)?
            .map(Self::row_to_event)
            .ok_or(EventError::not_found(id))
    }

    #[instrument(skip(self, input), fields(title = %input.title, time = %input.time))]
    pub async fn create(&self, input: EventFields) -> Result<EventWrite> {
        let overlap = self.find_overlap(input.time, None).await?;

        let row = self
            .db
            .create_event(input.into())
            .await
            .map_err(storage_error)?;

        let event = Self::row_to_event(row);
        Self::log_overlap(&event, overlap.as_ref());
        tracing::debug!(event_id = %event.id, "Created event");

        Ok(EventWrite { event, overlap })
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: Uuid, patch: EventPatch) -> Result<EventWrite> {
        let existing = self.get(id).await?;
        let fields = patch.merge(&existing)?;

        let overlap = self.find_overlap(fields.time, Some(id)).await?;

        let row = self
            .db
            .update_event(id, fields.into())
            .await
            .map_err(storage_error)?
            // Deleted between the read and the write
            .ok_or(EventError::not_found(id))?;

        let event = Self::row_to_event(row);
        Self::log_overlap(&event, overlap.as_ref());
        tracing::debug!(event_id = %event.id, "Updated event");

        Ok(EventWrite { event, overlap })
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let deleted = self.db.delete_event(id).await.map_err(storage_error)?;
        if !deleted {
            return Err(EventError::not_found(id));
        }
        tracing::debug!(event_id = %id, "Deleted event");
        Ok(())
    }

    async fn find_overlap(
        &self,
        range: TimeRange,
        exclude_id: Option<Uuid>,
    ) -> Result<Option<OverlapWarning>> {
        let row = self
            .db
            .find_overlapping_event(range, exclude_id)
            .await
            .map_err(storage_error)?;
        Ok(row.map(|row| OverlapWarning {
            overlapping_id: row.id,
            overlapping_title: row.title,
        }))
    }

    fn log_overlap(event: &Event, overlap: Option<&OverlapWarning>) {
        if let Some(overlap) = overlap {
            tracing::info!(
                event_id = %event.id,
                overlapping_id = %overlap.overlapping_id,
                overlapping_title = %overlap.overlapping_title,
                "Event overlaps an existing event"
            );
        }
    }

    fn row_to_event(row: EventRow) -> Event {
        Event {
            id: row.id,
            title: row.title,
            description: row.description,
            start_time: row.start_time,
            end_time: row.end_time,
            all_day: row.all_day,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn storage_error(err: anyhow::Error) -> EventError {
    EventError::storage(format!("{:#}", err))
}
