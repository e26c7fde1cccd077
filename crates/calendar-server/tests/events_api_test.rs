// HTTP tests for the events API against the in-memory backend
// Run with: cargo test -p calendar-server --test events_api_test

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use calendar_core::Event;
use calendar_server::storage::StorageBackend;
use calendar_server::{build_app, ServerConfig};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> Router {
    build_app(
        Arc::new(StorageBackend::in_memory()),
        &ServerConfig::default(),
    )
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn create(app: &Router, title: &str, start: &str, end: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/v1/events",
        Some(json!({ "title": title, "startTime": start, "endTime": end })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body
}

fn titles(list: &Value) -> Vec<String> {
    list["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_standup_sync_walkthrough() {
    let app = test_app();

    // Create Standup into an empty store
    let standup = create(&app, "Standup", "2024-01-01T09:00Z", "2024-01-01T09:30Z").await;
    assert!(standup.get("warning").is_none());
    assert!(standup.get("overlappingId").is_none());
    let standup_id = standup["event"]["id"].as_str().unwrap().to_string();

    // Sync overlaps Standup but is still created
    let sync = create(&app, "Sync", "2024-01-01T09:15Z", "2024-01-01T09:45Z").await;
    assert_eq!(sync["warning"], "Event overlaps an existing event");
    assert_eq!(sync["overlappingId"], standup_id.as_str());
    let sync_id = sync["event"]["id"].as_str().unwrap().to_string();

    // Range [9:30, 10:00) only sees Sync
    let (status, list) = send(
        &app,
        Method::GET,
        "/v1/events?start=2024-01-01T09:30Z&end=2024-01-01T10:00Z",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&list), vec!["Sync"]);
    assert_eq!(list["data"][0]["id"], sync_id.as_str());

    // Shrink Standup so it no longer touches Sync
    let (status, updated) = send(
        &app,
        Method::PATCH,
        &format!("/v1/events/{}", standup_id),
        Some(json!({ "endTime": "2024-01-01T09:10Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(updated.get("warning").is_none());
    assert_eq!(updated["event"]["title"], "Standup");

    let event: Event = serde_json::from_value(updated["event"].clone()).unwrap();
    assert_eq!(event.end_time.to_rfc3339(), "2024-01-01T09:10:00+00:00");
}

#[tokio::test]
async fn test_list_without_range_is_ordered() {
    let app = test_app();
    create(&app, "Lunch", "2024-01-01T12:00Z", "2024-01-01T13:00Z").await;
    create(&app, "Standup", "2024-01-01T09:00Z", "2024-01-01T09:30Z").await;

    let (status, list) = send(&app, Method::GET, "/v1/events", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&list), vec!["Standup", "Lunch"]);
}

#[tokio::test]
async fn test_list_ignores_unparseable_or_partial_range() {
    let app = test_app();
    create(&app, "Standup", "2024-01-01T09:00Z", "2024-01-01T09:30Z").await;
    create(&app, "Lunch", "2024-01-01T12:00Z", "2024-01-01T13:00Z").await;

    for uri in [
        "/v1/events?start=2024-01-01T09:00Z",
        "/v1/events?start=yesterday&end=2024-01-01T09:10Z",
    ] {
        let (status, list) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(titles(&list).len(), 2, "{}", uri);
    }
}

#[tokio::test]
async fn test_create_validation_errors() {
    let app = test_app();

    let cases = [
        json!({ "startTime": "2024-01-01T09:00Z", "endTime": "2024-01-01T10:00Z" }),
        json!({ "title": "  ", "startTime": "2024-01-01T09:00Z", "endTime": "2024-01-01T10:00Z" }),
        json!({ "title": "x", "endTime": "2024-01-01T10:00Z" }),
        json!({ "title": "x", "startTime": "soon", "endTime": "2024-01-01T10:00Z" }),
        json!({ "title": "x", "startTime": "2024-01-01T10:00Z", "endTime": "2024-01-01T10:00Z" }),
        json!({ "title": "x", "startTime": "2024-01-01T11:00Z", "endTime": "2024-01-01T10:00Z" }),
    ];

    for case in cases {
        let (status, body) = send(&app, Method::POST, "/v1/events", Some(case.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", case);
        assert!(body["error"].is_string());
    }

    // Nothing was persisted
    let (_, list) = send(&app, Method::GET, "/v1/events", None).await;
    assert!(list["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_defaults_optional_fields() {
    let app = test_app();
    let created = create(&app, " Review ", "2024-01-01", "2024-01-02").await;

    assert_eq!(created["event"]["title"], "Review");
    assert_eq!(created["event"]["description"], "");
    assert_eq!(created["event"]["allDay"], false);
}

#[tokio::test]
async fn test_get_event() {
    let app = test_app();
    let created = create(&app, "Standup", "2024-01-01T09:00Z", "2024-01-01T09:30Z").await;
    let id = created["event"]["id"].as_str().unwrap();

    let (status, event) = send(&app, Method::GET, &format!("/v1/events/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["title"], "Standup");

    let missing = uuid::Uuid::now_v7();
    let (status, body) = send(&app, Method::GET, &format!("/v1/events/{}", missing), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Event not found");
}

#[tokio::test]
async fn test_put_and_patch_share_semantics() {
    let app = test_app();
    let created = create(&app, "Standup", "2024-01-01T09:00Z", "2024-01-01T09:30Z").await;
    let uri = format!("/v1/events/{}", created["event"]["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "title": "Daily" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["title"], "Daily");
    assert_eq!(body["event"]["startTime"], created["event"]["startTime"]);

    // Empty timestamps are treated as omitted
    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "startTime": "", "endTime": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["endTime"], created["event"]["endTime"]);
}

#[tokio::test]
async fn test_update_to_same_values_does_not_warn() {
    let app = test_app();
    let created = create(&app, "Standup", "2024-01-01T09:00Z", "2024-01-01T09:30Z").await;
    let uri = format!("/v1/events/{}", created["event"]["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({
            "title": "Standup",
            "startTime": "2024-01-01T09:00Z",
            "endTime": "2024-01-01T09:30Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("warning").is_none());
}

#[tokio::test]
async fn test_update_errors() {
    let app = test_app();
    let created = create(&app, "Standup", "2024-01-01T09:00Z", "2024-01-01T09:30Z").await;
    let uri = format!("/v1/events/{}", created["event"]["id"].as_str().unwrap());

    // Merged interval is inverted
    let (status, _) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "startTime": "2024-01-01T10:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({ "title": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let missing = format!("/v1/events/{}", uuid::Uuid::now_v7());
    let (status, _) = send(&app, Method::PATCH, &missing, Some(json!({ "title": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_reports_overlap_with_update_warning() {
    let app = test_app();
    let standup = create(&app, "Standup", "2024-01-01T09:00Z", "2024-01-01T09:30Z").await;
    let lunch = create(&app, "Lunch", "2024-01-01T12:00Z", "2024-01-01T13:00Z").await;
    let uri = format!("/v1/events/{}", lunch["event"]["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "startTime": "2024-01-01T09:20Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["warning"], "Updated event overlaps an existing event");
    assert_eq!(body["overlappingId"], standup["event"]["id"]);
}

#[tokio::test]
async fn test_delete_twice() {
    let app = test_app();
    let created = create(&app, "Standup", "2024-01-01T09:00Z", "2024-01-01T09:30Z").await;
    let uri = format!("/v1/events/{}", created["event"]["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_missing_event_is_not_found_before_bad_input() {
    let app = test_app();
    let missing = format!("/v1/events/{}", uuid::Uuid::now_v7());

    for method in [Method::PATCH, Method::PUT] {
        let (status, body) = send(
            &app,
            method,
            &missing,
            Some(json!({ "startTime": "garbage" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Event not found");
    }

    // An existing event still gets the validation message
    let created = create(&app, "Standup", "2024-01-01T09:00Z", "2024-01-01T09:30Z").await;
    let uri = format!("/v1/events/{}", created["event"]["id"].as_str().unwrap());
    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "startTime": "garbage" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "startTime is not a valid timestamp");
}

#[tokio::test]
async fn test_non_uuid_id_is_not_found() {
    let app = test_app();
    create(&app, "Standup", "2024-01-01T09:00Z", "2024-01-01T09:30Z").await;

    for (method, body) in [
        (Method::GET, None),
        (Method::PUT, Some(json!({ "title": "Renamed" }))),
        (Method::PATCH, Some(json!({ "startTime": "garbage" }))),
        (Method::DELETE, None),
    ] {
        let (status, response) = send(&app, method.clone(), "/v1/events/abc", body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", method);
        assert_eq!(response["error"], "Event not found", "{}", method);
    }

    // Nothing was removed
    let (_, list) = send(&app, Method::GET, "/v1/events", None).await;
    assert_eq!(titles(&list), vec!["Standup"]);
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/v1/events")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_wrong_field_type_is_validation_error() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/events",
        Some(json!({ "title": 5, "startTime": "2024-01-01T09:00Z", "endTime": "2024-01-01T09:30Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let created = create(&app, "Standup", "2024-01-01T09:00Z", "2024-01-01T09:30Z").await;
    let uri = format!("/v1/events/{}", created["event"]["id"].as_str().unwrap());
    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "allDay": "yes" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_sub_microsecond_interval_is_rejected() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/events",
        Some(json!({
            "title": "Blink",
            "startTime": "2024-01-01T09:00:00.0000001Z",
            "endTime": "2024-01-01T09:00:00.0000009Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_openapi_is_served() {
    let app = test_app();
    let (status, doc) = send(&app, Method::GET, "/api-doc/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/v1/events"].is_object());
}
