//! clubsite-admin - operator tooling for the club site Content API
//!
//! Session handling and local state for events and site configuration,
//! driven by the `clubsite-admin` command line.

pub mod auth;
pub mod client;
pub mod events;
pub mod site_configs;

pub use auth::{AuthStore, TokenFile};
pub use client::{AdminClient, ClientError};
pub use events::EventsStore;
pub use site_configs::SiteConfigsStore;
