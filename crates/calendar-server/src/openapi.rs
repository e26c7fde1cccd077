// OpenAPI specification generation
//
// Used by the server (for Swagger UI) and the export-openapi binary
// (for static spec generation).

use crate::api;
use crate::api::{DeleteResponse, ErrorResponse, ListResponse};
use calendar_core::Event;
use utoipa::OpenApi;

/// OpenAPI documentation for the Calendar API
#[derive(OpenApi)]
#[openapi(
    paths(
        api::events::list_events,
        api::events::get_event,
        api::events::create_event,
        api::events::update_event,
        api::events::delete_event,
    ),
    components(
        schemas(
            Event,
            api::events::CreateEventRequest,
            api::events::UpdateEventRequest,
            api::events::EventWriteResponse,
            ListResponse<Event>,
            DeleteResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "events", description = "Calendar event endpoints")
    ),
    info(
        title = "Calendar API",
        version = "0.1.0",
        description = "API for storing calendar events and querying them by time range",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> serde_json::Result<String> {
        Self::openapi().to_pretty_json()
    }
}
