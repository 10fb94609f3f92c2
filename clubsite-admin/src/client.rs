//! HTTP client for the Content API admin surface

use std::time::Duration;

use clubsite_common::api::types::error_message;
use clubsite_common::api::{
    DataResponse, ListResponse, LoginRequest, LoginResponse, MessageResponse, SuccessResponse,
    VerifyResponse,
};
use clubsite_common::models::{
    ConfigType, Event, EventDraft, EventFilters, SiteConfig, SiteConfigDetail, SiteConfigDraft,
    SiteConfigMap,
};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

const USER_AGENT: &str = concat!("clubsite-admin/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Token file error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Message suitable for showing to the operator
    ///
    /// Server-provided text wins; otherwise `default`.
    pub fn user_message(&self, default: &str) -> String {
        match self {
            ClientError::Status { message, .. } if !message.is_empty() => message.clone(),
            ClientError::NotAuthenticated => self.to_string(),
            _ => default.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminClient {
    http_client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl AdminClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, url = %url, "Admin API request");
        let builder = self.http_client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Request that must carry a bearer token
    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        if self.token.is_none() {
            return Err(ClientError::NotAuthenticated);
        }
        Ok(self.request(method, path))
    }

    async fn execute<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = match response.json::<serde_json::Value>().await {
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

    async fn send_json<B, T>(builder: RequestBuilder, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        Self::execute(builder.json(body)).await
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ClientError> {
        Self::send_json(self.request(Method::POST, "/auth/login"), credentials).await
    }

    pub async fn verify(&self) -> Result<VerifyResponse, ClientError> {
        Self::execute(self.authorized(Method::GET, "/auth/verify")?).await
    }

    pub async fn logout(&self) -> Result<MessageResponse, ClientError> {
        Self::execute(self.authorized(Method::POST, "/auth/logout")?).await
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub async fn list_events(
        &self,
        filters: &EventFilters,
    ) -> Result<ListResponse<Event>, ClientError> {
        let query = filters.to_query_pairs();
        Self::execute(self.request(Method::GET, "/api/events").query(&query)).await
    }

    pub async fn get_event(&self, id: Uuid) -> Result<DataResponse<Event>, ClientError> {
        Self::execute(self.request(Method::GET, &format!("/api/events/{}", id))).await
    }

    pub async fn create_event(&self, draft: &EventDraft) -> Result<DataResponse<Event>, ClientError> {
        Self::send_json(self.authorized(Method::POST, "/api/events")?, draft).await
    }

    pub async fn update_event(
        &self,
        id: Uuid,
        draft: &EventDraft,
    ) -> Result<DataResponse<Event>, ClientError> {
        let path = format!("/api/events/{}", id);
        Self::send_json(self.authorized(Method::PUT, &path)?, draft).await
    }

    pub async fn delete_event(&self, id: Uuid) -> Result<SuccessResponse, ClientError> {
        let path = format!("/api/events/{}", id);
        Self::execute(self.authorized(Method::DELETE, &path)?).await
    }

    // ------------------------------------------------------------------
    // Site configuration
    // ------------------------------------------------------------------

    pub async fn site_configs(&self) -> Result<DataResponse<SiteConfigMap>, ClientError> {
        Self::execute(self.request(Method::GET, "/api/siteconfigs")).await
    }

    pub async fn site_config(
        &self,
        config_type: ConfigType,
    ) -> Result<DataResponse<SiteConfigDetail>, ClientError> {
        let path = format!("/api/siteconfigs/{}", config_type.as_str());
        Self::execute(self.request(Method::GET, &path)).await
    }

    pub async fn create_site_config(
        &self,
        draft: &SiteConfigDraft,
    ) -> Result<DataResponse<SiteConfig>, ClientError> {
        Self::send_json(self.authorized(Method::POST, "/api/siteconfigs")?, draft).await
    }

    pub async fn update_site_config(
        &self,
        config_type: ConfigType,
        draft: &SiteConfigDraft,
    ) -> Result<DataResponse<SiteConfig>, ClientError> {
        let path = format!("/api/siteconfigs/{}", config_type.as_str());
        Self::send_json(self.authorized(Method::PUT, &path)?, draft).await
    }
}
