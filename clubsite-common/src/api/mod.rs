//! API module for shared HTTP API functionality
//!
//! Provides authentication helpers and the JSON envelopes used by the
//! content server and both of its clients.
//!
//! # Design Principle
//!
//! This module contains ONLY:
//! - Pure functions (no HTTP framework dependencies)
//! - Database operations (via sqlx, feature-gated)
//! - Shared types
//!
//! The server wraps these with Axum extractors; the clients decode with reqwest.

pub mod auth;
pub mod types;

pub use auth::{
    bearer_token, issue_token, parse_expires_in, verify_token, AdminCredentials, ApiAuthError,
    Claims, ADMIN_ROLE,
};
pub use types::{
    AuthUser, ConfigErrorResponse, DataResponse, ErrorResponse, ListResponse, LoginRequest,
    LoginResponse, MessageResponse, SuccessResponse, VerifyResponse,
};
