//! Read-only client for the Content API
//!
//! The public site only ever reads. Bodies are handed back as raw JSON so the
//! managers can apply their own shape checks and keep prior content when a
//! response does not look right.

use std::future::Future;
use std::time::Duration;

use clubsite_common::api::types::error_message;
use clubsite_common::models::EventFilters;
use serde_json::Value;
use thiserror::Error;

const USER_AGENT: &str = concat!("clubsite-web/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Where the public site gets its content
pub trait ContentSource {
    /// Body of `GET /api/siteconfigs`
    fn fetch_site_configs(&self) -> impl Future<Output = Result<Value, ClientError>> + Send;

    /// Body of `GET /api/events` with the given filters
    fn fetch_events(
        &self,
        filters: &EventFilters,
    ) -> impl Future<Output = Result<Value, ClientError>> + Send;
}

#[derive(Debug, Clone)]
pub struct ContentClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ContentClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "Fetching content");

        let response = self.http_client.get(&url).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = match response.json::<Value>().await {
                Ok(body) => error_message(&body).unwrap_or_default(),
                Err(_) => String::new(),
            };
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

impl ContentSource for ContentClient {
    async fn fetch_site_configs(&self) -> Result<Value, ClientError> {
        self.get_json("/api/siteconfigs", &[]).await
    }

    async fn fetch_events(&self, filters: &EventFilters) -> Result<Value, ClientError> {
        let query: Vec<(&str, String)> = filters.to_query_pairs();
        self.get_json("/api/events", &query).await
    }
}
