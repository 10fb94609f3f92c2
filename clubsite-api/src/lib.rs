//! clubsite-api library - content API for the club website
//!
//! Serves events and the site-wide marquee/SoundCloud configuration to the
//! public site, and accepts admin writes authenticated with bearer tokens.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use clubsite_common::api::AdminCredentials;
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub mod api;
pub mod config;
pub mod db;

/// Token signing and admin login settings
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub secret: Arc<[u8]>,
    pub token_ttl: Duration,
    pub admin: AdminCredentials,
}

impl AuthSettings {
    pub fn new(secret: impl AsRef<[u8]>, token_ttl: Duration, admin: AdminCredentials) -> Self {
        Self {
            secret: Arc::from(secret.as_ref()),
            token_ttl,
            admin,
        }
    }
}

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    pub auth: Arc<AuthSettings>,
    /// Allowed browser origins; empty allows any
    pub cors_origins: Arc<Vec<String>>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, auth: AuthSettings) -> Self {
        Self {
            db,
            auth: Arc::new(auth),
            cors_origins: Arc::new(Vec::new()),
        }
    }

    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Arc::new(origins);
        self
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(allowed)
}

/// Build application router
///
/// Reads and `/health` are public; event and configuration writes check
/// for an admin token in their handlers.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let cors = cors_layer(&state.cors_origins);

    Router::new()
        .merge(api::event_routes())
        .merge(api::site_config_routes())
        .merge(api::auth_routes())
        .merge(api::health_routes())
        .route("/api/buildinfo", get(api::get_build_info))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
