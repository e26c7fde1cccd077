// Calendar event HTTP routes
//
// Writes never fail because of an overlap; an overlap is reported in the
// response next to the stored event.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use calendar_core::{Event, EventError, EventFields, EventPatch, EventWrite, TimeRange};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::common::{event_error, ApiError, DeleteResponse, ErrorResponse, ListResponse};
use crate::services::EventService;
use crate::storage::StorageBackend;

const CREATE_OVERLAP_WARNING: &str = "Event overlaps an existing event";
const UPDATE_OVERLAP_WARNING: &str = "Updated event overlaps an existing event";

/// Request to create a new event
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    /// Event title. Leading and trailing whitespace is trimmed.
    #[schema(example = "Standup")]
    pub title: Option<String>,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Inclusive start of the event.
    #[schema(example = "2024-01-01T09:00:00Z")]
    pub start_time: Option<String>,
    /// Exclusive end of the event. Must be after `startTime`.
    #[schema(example = "2024-01-01T09:30:00Z")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
}

/// Request to update an event. Only provided fields will be updated.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Daily standup")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Empty string is treated as omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// Empty string is treated as omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
}

/// Query parameters for event listing
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct ListEventsQuery {
    /// Start of the query window. Ignored unless `end` is also valid.
    pub start: Option<String>,
    /// End of the query window. Ignored unless `start` is also valid.
    pub end: Option<String>,
}

/// Stored event plus the advisory overlap report, if any
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventWriteResponse {
    pub event: Event,
    /// Present together with `overlappingId` when the event intersects another one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlapping_id: Option<Uuid>,
}

impl EventWriteResponse {
    fn new(write: EventWrite, warning: &str) -> Self {
        let (warning, overlapping_id) = match write.overlap {
            Some(overlap) => (Some(warning.to_string()), Some(overlap.overlapping_id)),
            None => (None, None),
        };
        Self {
            event: write.event,
            warning,
            overlapping_id,
        }
    }
}

// ============================================
// App State and Routes
// ============================================

/// App state for event routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EventService>,
}

impl AppState {
    pub fn new(db: Arc<StorageBackend>) -> Self {
        Self {
            service: Arc::new(EventService::new(db)),
        }
    }
}

/// Create event routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/events", get(list_events).post(create_event))
        .route(
            "/v1/events/:event_id",
            get(get_event)
                .put(update_event)
                .patch(update_event)
                .delete(delete_event),
        )
        .with_state(state)
}

// ============================================
// HTTP Handlers
// ============================================

/// Ids are opaque to callers: one that is not a UUID names no event.
fn parse_event_id(raw: &str) -> Result<Uuid, EventError> {
    Uuid::parse_str(raw).map_err(|_| EventError::not_found(raw))
}

/// Unreadable bodies (bad JSON, wrong field types) are validation failures.
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        ErrorResponse::new(rejection.body_text()).into_response(StatusCode::BAD_REQUEST)
    })
}

/// GET /v1/events - List events, optionally only those overlapping a window
#[utoipa::path(
    get,
    path = "/v1/events",
    params(ListEventsQuery),
    responses(
        (status = 200, description = "Events ordered by start time", body = ListResponse<Event>),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<ListResponse<Event>>, ApiError> {
    let range = TimeRange::from_query(query.start.as_deref(), query.end.as_deref());

    let events = state
        .service
        .list(range)
        .await
        .map_err(|e| event_error(e, "list events"))?;

    Ok(Json(ListResponse::new(events)))
}

/// GET /v1/events/{event_id} - Get event by ID
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    let event_id = parse_event_id(&event_id).map_err(|e| event_error(e, "get event"))?;
    let event = state
        .service
        .get(event_id)
        .await
        .map_err(|e| event_error(e, "get event"))?;

    Ok(Json(event))
}

/// POST /v1/events - Create a new event
#[utoipa::path(
    post,
    path = "/v1/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created, possibly with an overlap warning", body = EventWriteResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    body: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EventWriteResponse>), ApiError> {
    let req = json_body(body)?;
    let fields = EventFields::parse(
        req.title.as_deref(),
        req.description.as_deref(),
        req.start_time.as_deref(),
        req.end_time.as_deref(),
        req.all_day,
    )
    .map_err(|e| event_error(e, "create event"))?;

    let write = state
        .service
        .create(fields)
        .await
        .map_err(|e| event_error(e, "create event"))?;

    Ok((
        StatusCode::CREATED,
        Json(EventWriteResponse::new(write, CREATE_OVERLAP_WARNING)),
    ))
}

/// PUT or PATCH /v1/events/{event_id} - Update event
#[utoipa::path(
    patch,
    path = "/v1/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated, possibly with an overlap warning", body = EventWriteResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    body: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> Result<Json<EventWriteResponse>, ApiError> {
    let event_id = parse_event_id(&event_id).map_err(|e| event_error(e, "update event"))?;
    let req = json_body(body)?;

    let patch = match EventPatch::parse(
        req.title.as_deref(),
        req.description.as_deref(),
        req.start_time.as_deref(),
        req.end_time.as_deref(),
        req.all_day,
    ) {
        Ok(patch) => patch,
        Err(e) => {
            // A missing event is reported ahead of bad input
            state
                .service
                .get(event_id)
                .await
                .map_err(|e| event_error(e, "update event"))?;
            return Err(event_error(e, "update event"));
        }
    };

    let write = state
        .service
        .update(event_id, patch)
        .await
        .map_err(|e| event_error(e, "update event"))?;

    Ok(Json(EventWriteResponse::new(write, UPDATE_OVERLAP_WARNING)))
}

/// DELETE /v1/events/{event_id} - Delete event
#[utoipa::path(
    delete,
    path = "/v1/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event deleted", body = DeleteResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let event_id = parse_event_id(&event_id).map_err(|e| event_error(e, "delete event"))?;
    state
        .service
        .delete(event_id)
        .await
        .map_err(|e| event_error(e, "delete event"))?;

    Ok(Json(DeleteResponse { success: true }))
}
