//! Authentication for clubsite-api
//!
//! Bearer tokens are checked by two extractors: [`Authenticated`] accepts any
//! valid token, [`AdminUser`] additionally requires the admin role. Handlers
//! that take one of them are protected; everything else is public.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
    Json, Router,
};
use clubsite_common::api::{
    bearer_token, issue_token, verify_token, AuthUser, Claims, LoginRequest, LoginResponse,
    MessageResponse, VerifyResponse,
};
use clubsite_common::time::now;
use clubsite_common::validation::validate_credentials;
use tracing::{debug, info};

use super::ApiError;
use crate::AppState;

/// Caller holding a valid token
#[derive(Debug, Clone)]
pub struct Authenticated(pub Claims);

/// Caller holding a valid admin token
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or(ApiError::MissingToken)?;

        let claims = verify_token(token, &state.auth.secret, now()).map_err(|e| {
            debug!("Token rejected: {}", e);
            ApiError::InvalidToken
        })?;

        Ok(Authenticated(claims))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Authenticated(claims) = Authenticated::from_request_parts(parts, state).await?;
        if !claims.is_admin() {
            return Err(ApiError::AdminRequired);
        }
        Ok(AdminUser(claims))
    }
}

/// POST /auth/login
///
/// Exchanges the configured admin credentials for a signed token.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload?;
    let username =
        validate_credentials(&request.username, &request.password).map_err(ApiError::Validation)?;

    if !state.auth.admin.matches(&username, &request.password) {
        return Err(ApiError::InvalidCredentials);
    }

    let claims = Claims::admin(username, now(), state.auth.token_ttl);
    let token = issue_token(&claims, &state.auth.secret)
        .map_err(|e| ApiError::internal("Internal server error during login", e))?;

    info!(username = %claims.username, "Admin logged in");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: AuthUser {
            username: claims.username,
            role: claims.role,
        },
    }))
}

/// GET /auth/verify
pub async fn verify(Authenticated(claims): Authenticated) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        message: "Token is valid".to_string(),
        user: AuthUser {
            username: claims.username,
            role: claims.role,
        },
    })
}

/// POST /auth/logout
///
/// Tokens are stateless; the client discards its copy.
pub async fn logout(Authenticated(claims): Authenticated) -> Json<MessageResponse> {
    info!(username = %claims.username, "Admin logged out");
    Json(MessageResponse {
        message: "Logout successful. Please remove the token from client storage.".to_string(),
    })
}

/// Build authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/verify", get(verify))
        .route("/auth/logout", post(logout))
}
