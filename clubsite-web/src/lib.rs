//! clubsite-web library - public site core
//!
//! Fetches content from the Content API, renders the marquee and event list,
//! and drives the embedded SoundCloud player through the
//! [`playback::PlaybackReconciler`].

pub mod client;
pub mod embed;
pub mod events;
pub mod page;
pub mod playback;
pub mod site_config;

pub use client::{ClientError, ContentClient, ContentSource};
pub use embed::convert_to_embed_url;
pub use events::{render_event, render_events, EventsManager};
pub use page::{SitePage, StaticPage};
pub use site_config::{EmbedTarget, LoadOutcome, SiteConfigManager, StaticEmbed};
