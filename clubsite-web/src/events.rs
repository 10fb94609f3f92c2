//! Event Renderer
//!
//! Turns event records from the Content API into the markup of the public
//! event list.

use std::sync::atomic::AtomicBool;

use chrono::{DateTime, Utc};
use clubsite_common::models::{Event, EventFilters};
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::ContentSource;
use crate::page::{escape_html, SitePage};
use crate::site_config::{LoadOutcome, LoadingGuard};

/// Number of upcoming events shown on the public page
pub const UPCOMING_LIMIT: u32 = 10;

/// `Sun · 05 Jan 2025`
pub fn format_event_date(date: &DateTime<Utc>) -> String {
    date.format("%a · %d %b %Y").to_string()
}

/// `Line-up: <strong>A</strong>, <strong>B</strong>`, or empty when no
/// artist is named
pub fn format_lineup(lineup: &[String]) -> String {
    let artists: Vec<String> = lineup
        .iter()
        .filter(|artist| !artist.trim().is_empty())
        .map(|artist| format!("<strong>{}</strong>", escape_html(artist)))
        .collect();
    if artists.is_empty() {
        String::new()
    } else {
        format!("Line-up: {}", artists.join(", "))
    }
}

pub fn format_tags(tags: &[String]) -> String {
    tags.iter()
        .filter(|tag| !tag.trim().is_empty())
        .map(|tag| format!("<span>{}</span>", escape_html(tag)))
        .collect()
}

pub fn render_event(event: &Event) -> String {
    let lineup = format_lineup(&event.lineup);
    let tags = format_tags(&event.tags);

    let mut html = String::from("<article class=\"event\">\n");
    html.push_str("  <header>\n");
    html.push_str(&format!(
        "    <time datetime=\"{}\">{}</time>\n",
        event.date.format("%Y-%m-%d"),
        format_event_date(&event.date)
    ));
    html.push_str(&format!("    <h3>{}</h3>\n", escape_html(&event.title)));
    html.push_str("  </header>\n");
    if !lineup.is_empty() {
        html.push_str(&format!("  <p class=\"lineup\">{}</p>\n", lineup));
    }
    if !tags.is_empty() {
        html.push_str(&format!("  <div class=\"tags\">{}</div>\n", tags));
    }
    html.push_str("  <a class=\"btn btn--small\" href=\"#tickets\">Tickets</a>\n");
    html.push_str("</article>\n");
    html
}

pub fn render_events(events: &[Event]) -> String {
    if events.is_empty() {
        return empty_block();
    }
    events.iter().map(render_event).collect()
}

pub fn empty_block() -> String {
    "<div class=\"events-empty\">\n  <h3>No upcoming events</h3>\n  \
     <p>Check back soon for new events!</p>\n</div>\n"
        .to_string()
}

pub fn loading_block() -> String {
    "<div class=\"events-loading\">\n  <div class=\"loading-spinner\"></div>\n  \
     <p>Loading upcoming events...</p>\n</div>\n"
        .to_string()
}

pub fn error_block(message: &str) -> String {
    format!(
        "<div class=\"events-error\">\n  <p>Unable to load events: {}</p>\n  \
         <p>Please try again later.</p>\n</div>\n",
        escape_html(message)
    )
}

/// Events of a `{success, data: [...]}` body, `None` if the shape is off
fn events_from_body(body: &Value) -> Option<Vec<Event>> {
    if body.get("success").and_then(Value::as_bool) != Some(true) {
        return None;
    }
    let data = body.get("data")?;
    if !data.is_array() {
        return None;
    }
    serde_json::from_value(data.clone()).ok()
}

#[derive(Debug, Default)]
pub struct EventsManager {
    is_loading: AtomicBool,
}

impl EventsManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the upcoming events once and render them into the page
    ///
    /// The loading block is shown while the request runs. A failed request
    /// puts the prior content back.
    pub async fn load_events<C, P>(&self, source: &C, page: &mut P) -> LoadOutcome
    where
        C: ContentSource,
        P: SitePage,
    {
        let Some(prior) = page.events_html() else {
            return LoadOutcome::NothingToUpdate;
        };
        let Some(_guard) = LoadingGuard::acquire(&self.is_loading) else {
            return LoadOutcome::AlreadyLoading;
        };

        page.set_events_html(loading_block());

        let body = match source.fetch_events(&EventFilters::upcoming(UPCOMING_LIMIT)).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to load dynamic events: {}", e);
                page.set_events_html(prior);
                return LoadOutcome::Failed;
            }
        };

        match events_from_body(&body) {
            Some(events) => {
                debug!(count = events.len(), "Rendering upcoming events");
                page.set_events_html(render_events(&events));
                LoadOutcome::Applied
            }
            None => {
                page.set_events_html(error_block("Invalid response format from server"));
                LoadOutcome::InvalidResponse
            }
        }
    }
}
