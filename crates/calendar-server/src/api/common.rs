// Common DTOs for public API
//
// These types are shared across multiple API endpoints.

use axum::http::StatusCode;
use axum::Json;
use calendar_core::EventError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard error response for API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message describing what went wrong.
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// Convert to axum response tuple
    pub fn into_response(self, status: StatusCode) -> (StatusCode, Json<Self>) {
        (status, Json(self))
    }
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a domain error onto its HTTP status and body.
///
/// Storage detail is logged and replaced with a generic message.
pub fn event_error(e: EventError, action: &str) -> ApiError {
    match e {
        EventError::Validation(reason) => {
            ErrorResponse::new(reason).into_response(StatusCode::BAD_REQUEST)
        }
        EventError::NotFound(_) => {
            ErrorResponse::new("Event not found").into_response(StatusCode::NOT_FOUND)
        }
        EventError::StorageUnavailable(detail) => {
            tracing::error!("Failed to {}: {}", action, detail);
            ErrorResponse::new("Storage unavailable").into_response(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Response wrapper for list endpoints.
/// All list endpoints return responses wrapped in a `data` field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListResponse<T> {
    /// Array of items returned by the list operation.
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

/// Response for delete operations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}
