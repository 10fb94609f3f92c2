//! HTTP error mapping
//!
//! Event and auth routes answer failures with `{message, errors?}`; site
//! configuration routes with `{success:false, error, details?}`. Both share
//! [`ApiError`]; [`ConfigApiError`] only changes the body shape.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use clubsite_common::api::{ConfigErrorResponse, ErrorResponse};
use clubsite_common::FieldError;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    #[error("Access token is missing or invalid")]
    MissingToken,

    #[error("Token is invalid or expired")]
    InvalidToken,

    #[error("Admin access required")]
    AdminRequired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    NotFound(String),

    /// Logged in full; clients only see the public message
    #[error("{public}")]
    Internal { public: String, detail: String },
}

impl ApiError {
    pub fn internal(public: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            public: public.into(),
            detail: detail.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingToken | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken | ApiError::AdminRequired => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn log(&self) {
        match self {
            ApiError::Internal { public, detail } => error!("{}: {}", public, detail),
            ApiError::InvalidCredentials => warn!("Rejected login attempt"),
            _ => {}
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status();
        let body = match self {
            ApiError::Validation(errors) => ErrorResponse::with_errors("Validation failed", errors),
            other => ErrorResponse::new(other.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

/// [`ApiError`] rendered in the site configuration body shape
#[derive(Debug)]
pub struct ConfigApiError(pub ApiError);

impl From<ApiError> for ConfigApiError {
    fn from(err: ApiError) -> Self {
        ConfigApiError(err)
    }
}

impl From<JsonRejection> for ConfigApiError {
    fn from(rejection: JsonRejection) -> Self {
        ConfigApiError(rejection.into())
    }
}

impl IntoResponse for ConfigApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        err.log();
        let status = err.status();
        let body = match err {
            ApiError::Validation(details) => {
                ConfigErrorResponse::with_details("Validation failed", details)
            }
            other => ConfigErrorResponse::new(other.to_string()),
        };
        (status, Json(body)).into_response()
    }
}
