//! # shelfwise-http
//!
//! Client for the spreadsheet web app that serves placement rows.
//!
//! The endpoint answers every call with an envelope
//! `{ success, data?, message? }`. Envelopes are validated strictly; a
//! failed call or a missing `data` field yields empty rows rather than an
//! error so callers can carry on with nothing to show.

mod envelope;

pub use envelope::{rows_from_document, RowEnvelope};

use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use shelfwise_core::{ApiConfig, ShelfError, ShelfResult};
use shelfwise_sheet::RawRows;
use std::time::Duration;

/// Action the endpoint answers with its health and version.
pub const STATUS_ACTION: &str = "checkApiStatus";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Reply to a status check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStatus {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Fetches placement rows from the spreadsheet endpoint.
#[derive(Debug, Clone)]
pub struct RowSourceClient {
    client: Client,
    url: String,
    action: String,
}

impl RowSourceClient {
    /// Client for `url` with a 30-second timeout.
    ///
    /// # Errors
    ///
    /// Returns `ShelfError::Http` if the underlying client cannot be built.
    pub fn new(url: impl Into<String>) -> ShelfResult<Self> {
        Self::with_timeout(url, DEFAULT_TIMEOUT_SECS)
    }

    /// Client for `url` with a custom per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ShelfError::Http` if the underlying client cannot be built.
    pub fn with_timeout(url: impl Into<String>, timeout_secs: u64) -> ShelfResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            // Skip system proxy discovery
            .no_proxy()
            .build()
            .map_err(|e| ShelfError::Http(e.to_string()))?;

        Ok(RowSourceClient {
            client,
            url: url.into(),
            action: ApiConfig::default().action,
        })
    }

    /// Client built from the `api` section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ShelfError::Config` when no URL is configured.
    pub fn from_config(api: &ApiConfig) -> ShelfResult<Self> {
        let url = api
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| ShelfError::config("api.url is not set"))?;

        Ok(Self::with_timeout(url, api.timeout_secs)?.with_action(&api.action))
    }

    /// Use a different action name for row fetches
    #[must_use]
    pub fn with_action(mut self, action: &str) -> Self {
        self.action = action.to_string();
        self
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and validate the row envelope.
    ///
    /// # Errors
    ///
    /// `ShelfError::Http` on transport failures or non-2xx statuses and
    /// `ShelfError::Schema` when the body does not match the envelope shape.
    pub async fn fetch_envelope(&self) -> ShelfResult<RowEnvelope> {
        let body = serde_json::json!({ "action": self.action });
        let json = send_json(self.client.post(&self.url).json(&body)).await?;
        RowEnvelope::from_json(&json)
    }

    /// Fetch rows, treating a failed envelope as no rows.
    ///
    /// # Errors
    ///
    /// Same as [`fetch_envelope`](Self::fetch_envelope).
    pub async fn fetch_rows(&self) -> ShelfResult<RawRows> {
        let rows = self.fetch_envelope().await?.into_rows();
        tracing::info!("fetched {} rows from {}", rows.row_count(), self.url);
        Ok(rows)
    }

    /// Fetch rows, logging any failure and returning empty rows instead.
    pub async fn fetch_rows_or_empty(&self) -> RawRows {
        match self.fetch_rows().await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("row fetch from {} failed: {}", self.url, e);
                RawRows::new()
            }
        }
    }

    /// Ask the endpoint whether it is up.
    ///
    /// # Errors
    ///
    /// `ShelfError::Http` on transport failures and `ShelfError::Json` when
    /// the reply is not a status object.
    pub async fn check_status(&self) -> ShelfResult<ApiStatus> {
        let request = self
            .client
            .get(&self.url)
            .query(&[("action", STATUS_ACTION)]);
        let json = send_json(request).await?;
        Ok(serde_json::from_value(json)?)
    }
}

async fn send_json(request: RequestBuilder) -> ShelfResult<JsonValue> {
    let response = request
        .send()
        .await
        .map_err(|e| ShelfError::Http(e.to_string()))?;
    let response = check_success(response)?;

    response
        .json()
        .await
        .map_err(|e| ShelfError::Http(format!("Failed to parse JSON: {e}")))
}

fn check_success(response: Response) -> ShelfResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(ShelfError::Http(format!(
        "HTTP {} - {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_new() {
        let client = RowSourceClient::new("http://localhost/exec").unwrap();
        assert_eq!(client.url(), "http://localhost/exec");
        assert_eq!(client.action, "getShelfGrid");
    }

    #[test]
    fn test_from_config_requires_url() {
        let err = RowSourceClient::from_config(&ApiConfig::default()).unwrap_err();
        assert!(matches!(err, ShelfError::Config(_)));

        let api = ApiConfig {
            url: Some("http://localhost/exec".to_string()),
            action: "rows".to_string(),
            ..ApiConfig::default()
        };
        let client = RowSourceClient::from_config(&api).unwrap();
        assert_eq!(client.action, "rows");
    }
}
