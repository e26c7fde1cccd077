// Storage backend abstraction
// Decision: Use enum dispatch for simplicity over trait objects
//
// This module provides a unified StorageBackend enum that can work with
// either PostgreSQL (production) or in-memory (dev mode) storage.

use anyhow::Result;
use calendar_core::TimeRange;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use super::memory::InMemoryDatabase;
use super::models::*;
use super::repositories::Database;

/// Storage backend that can be either PostgreSQL or in-memory
#[derive(Clone)]
pub enum StorageBackend {
    /// PostgreSQL database (production)
    Postgres(Database),
    /// In-memory database (dev mode)
    InMemory(Arc<InMemoryDatabase>),
}

impl StorageBackend {
    /// Create a PostgreSQL storage backend from a database URL
    pub async fn postgres(database_url: &str) -> Result<Self> {
        let db = Database::from_url(database_url).await?;
        Ok(Self::Postgres(db))
    }

    /// Create an in-memory storage backend
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(InMemoryDatabase::new()))
    }

    /// Check if this is dev mode (in-memory)
    pub fn is_dev_mode(&self) -> bool {
        matches!(self, Self::InMemory(_))
    }

    /// Short backend name for health reporting
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::InMemory(_) => "memory",
        }
    }

    /// Get the PostgreSQL pool if using PostgreSQL backend
    /// Returns None for in-memory backend
    pub fn pool(&self) -> Option<&PgPool> {
        match self {
            Self::Postgres(db) => Some(db.pool()),
            Self::InMemory(_) => None,
        }
    }

    /// Apply schema migrations. No-op for the in-memory backend.
    pub async fn migrate(&self) -> Result<()> {
        match self {
            Self::Postgres(db) => db.migrate().await,
            Self::InMemory(_) => Ok(()),
        }
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEventRow) -> Result<EventRow> {
        match self {
            Self::Postgres(db) => db.create_event(input).await,
            Self::InMemory(db) => db.create_event(input).await,
        }
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        match self {
            Self::Postgres(db) => db.get_event(id).await,
            Self::InMemory(db) => db.get_event(id).await,
        }
    }

    pub async fn list_events(&self, range: Option<TimeRange>) -> Result<Vec<EventRow>> {
        match self {
            Self::Postgres(db) => db.list_events(range).await,
            Self::InMemory(db) => db.list_events(range).await,
        }
    }

    pub async fn find_overlapping_event(
        &self,
        range: TimeRange,
        exclude_id: Option<Uuid>,
    ) -> Result<Option<EventRow>> {
        match self {
            Self::Postgres(db) => db.find_overlapping_event(range, exclude_id).await,
            Self::InMemory(db) => db.find_overlapping_event(range, exclude_id).await,
        }
    }

    pub async fn update_event(&self, id: Uuid, input: UpdateEventRow) -> Result<Option<EventRow>> {
        match self {
            Self::Postgres(db) => db.update_event(id, input).await,
            Self::InMemory(db) => db.update_event(id, input).await,
        }
    }

    pub async fn delete_event(&self, id: Uuid) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.delete_event(id).await,
            Self::InMemory(db) => db.delete_event(id).await,
        }
    }
}
