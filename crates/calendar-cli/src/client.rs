// HTTP client wrapper for the Calendar API

use std::time::Duration;

use calendar_core::Event;
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Listing gives up after this long and degrades to an empty result
pub const LIST_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not found")]
    NotFound,
}

/// Body of a create request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub all_day: bool,
}

/// Body of an update request. Omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
}

/// Result of a create or update
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventWriteResponse {
    pub event: Event,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlapping_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct Client {
    base_url: String,
    http: reqwest::Client,
    list_timeout: Duration,
}

impl Client {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            list_timeout: LIST_TIMEOUT,
        }
    }

    #[cfg(test)]
    pub fn with_list_timeout(mut self, timeout: Duration) -> Self {
        self.list_timeout = timeout;
        self
    }

    /// List events, optionally restricted to a window.
    ///
    /// When the server cannot be reached or does not answer in time this logs
    /// a warning and returns an empty list. HTTP error responses are returned.
    pub async fn list_events(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<Event>, ClientError> {
        let url = format!("{}/v1/events", self.base_url);
        let mut query = Vec::new();
        if let Some(start) = start {
            query.push(("start", start));
        }
        if let Some(end) = end {
            query.push(("end", end));
        }

        let result = self
            .http
            .get(&url)
            .query(&query)
            .timeout(self.list_timeout)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) if Self::is_unreachable(&e) => return Ok(self.degraded_list(&e)),
            Err(e) => return Err(e.into()),
        };

        match self.handle_response::<ListResponse<Event>>(response).await {
            Ok(list) => Ok(list.data),
            Err(ClientError::Http(e)) if e.is_timeout() => Ok(self.degraded_list(&e)),
            Err(e) => Err(e),
        }
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Event, ClientError> {
        self.get(&format!("/v1/events/{}", id)).await
    }

    pub async fn create_event(
        &self,
        request: &CreateEventRequest,
    ) -> Result<EventWriteResponse, ClientError> {
        self.post("/v1/events", request).await
    }

    pub async fn update_event(
        &self,
        id: Uuid,
        request: &UpdateEventRequest,
    ) -> Result<EventWriteResponse, ClientError> {
        self.patch(&format!("/v1/events/{}", id), request).await
    }

    pub async fn delete_event(&self, id: Uuid) -> Result<(), ClientError> {
        self.delete(&format!("/v1/events/{}", id)).await
    }

    fn is_unreachable(e: &reqwest::Error) -> bool {
        e.is_timeout() || e.is_connect()
    }

    fn degraded_list(&self, e: &reqwest::Error) -> Vec<Event> {
        tracing::warn!(
            base_url = %self.base_url,
            error = %e,
            "Calendar API unavailable, showing no events"
        );
        Vec::new()
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url).send().await?;
        self.handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.post(&url).json(body).send().await?;
        self.handle_response(response).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.patch(&url).json(body).send().await?;
        self.handle_response(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.delete(&url).send().await?;

        if response.status() == StatusCode::NO_CONTENT || response.status() == StatusCode::OK {
            return Ok(());
        }

        Err(Self::error_from(response).await)
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body = response.json().await?;
        Ok(body)
    }

    async fn error_from(response: reqwest::Response) -> ClientError {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return ClientError::NotFound;
        }

        // Prefer the server's `{ "error": ... }` message over the raw body
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);

        ClientError::Api {
            status: status.as_u16(),
            message,
        }
    }
}
