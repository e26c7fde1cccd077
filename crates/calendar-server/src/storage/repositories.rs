// Repository layer for database operations
//
// Every range filter here uses `start_time < $end AND end_time > $start`,
// the same strict half-open test as `TimeRange::overlaps`.

use anyhow::{Context, Result};
use calendar_core::TimeRange;
use sqlx::PgPool;
use uuid::Uuid;

use crate::storage::models::*;

const EVENT_COLUMNS: &str =
    "id, title, description, start_time, end_time, all_day, created_at, updated_at";

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply embedded migrations from `migrations/`
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEventRow) -> Result<EventRow> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            INSERT INTO events (id, title, description, start_time, end_time, all_day)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(input.all_day)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// List events ordered by start time, optionally restricted to those
    /// overlapping `range`.
    pub async fn list_events(&self, range: Option<TimeRange>) -> Result<Vec<EventRow>> {
        let rows = match range {
            Some(range) => {
                sqlx::query_as::<_, EventRow>(&format!(
                    r#"
                    SELECT {EVENT_COLUMNS}
                    FROM events
                    WHERE start_time < $2 AND end_time > $1
                    ORDER BY start_time ASC, id ASC
                    "#
                ))
                .bind(range.start)
                .bind(range.end)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, EventRow>(&format!(
                    r#"
                    SELECT {EVENT_COLUMNS}
                    FROM events
                    ORDER BY start_time ASC, id ASC
                    "#
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows)
    }

    /// Find one event overlapping `range`, skipping `exclude_id` if given.
    /// The earliest-starting match is returned.
    pub async fn find_overlapping_event(
        &self,
        range: TimeRange,
        exclude_id: Option<Uuid>,
    ) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE start_time < $2 AND end_time > $1
              AND ($3::uuid IS NULL OR id <> $3)
            ORDER BY start_time ASC, id ASC
            LIMIT 1
            "#
        ))
        .bind(range.start)
        .bind(range.end)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update_event(&self, id: Uuid, input: UpdateEventRow) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            UPDATE events
            SET
                title = $2,
                description = $3,
                start_time = $4,
                end_time = $5,
                all_day = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(input.all_day)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_event(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
