//! HTTP API handlers for clubsite-api

pub mod auth;
pub mod buildinfo;
pub mod error;
pub mod events;
pub mod health;
pub mod siteconfigs;

pub use auth::{auth_routes, AdminUser, Authenticated};
pub use buildinfo::{get_build_info, BuildInfo};
pub use error::{ApiError, ConfigApiError};
pub use events::event_routes;
pub use health::health_routes;
pub use siteconfigs::site_config_routes;
