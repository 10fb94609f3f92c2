//! # Club Site Common Library
//!
//! Shared code for the club site crates including:
//! - Event and site configuration models
//! - Request validation rules
//! - API envelopes and JWT helpers
//! - Configuration loading
//! - Database initialization (feature `sqlx`)

pub mod api;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod models;
pub mod time;
pub mod uuid_utils;
pub mod validation;

pub use error::{Error, Result};
pub use models::{ConfigType, Event, SiteConfig, SiteConfigMap};
pub use validation::FieldError;
