//! Shared API request/response types
//!
//! The envelopes follow the shapes the public site and admin UI expect:
//! `{success, count, data}` for lists, `{success, message?, data}` for
//! single documents and `{message, errors?}` / `{success:false, error,
//! details?}` for failures.

use serde::{Deserialize, Serialize};

use crate::validation::FieldError;

// ========================================
// Success Envelopes
// ========================================

/// List envelope (`GET /api/events`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Single-document envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

/// Data-less success (`DELETE /api/events/:id`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Bare message (`POST /auth/logout`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ========================================
// Error Envelopes
// ========================================

/// Error body used by event and auth routes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
        }
    }

    pub fn with_errors(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            message: message.into(),
            errors: Some(errors),
        }
    }
}

/// Error body used by site configuration routes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ConfigErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: Some(details),
        }
    }
}

/// Best-effort human message from any error body the server produces
pub fn error_message(body: &serde_json::Value) -> Option<String> {
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

// ========================================
// Authentication Types
// ========================================

/// `POST /auth/login` body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Authenticated user as reported to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub username: String,
    pub role: String,
}

/// `POST /auth/login` success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: AuthUser,
}

/// `GET /auth/verify` success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub message: String,
    pub user: AuthUser,
}

// ========================================
// Tests
// ========================================
