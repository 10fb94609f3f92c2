//! Page regions the content managers write into

/// Escape text for use as HTML element content
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// Marquee track content: one `<span>` per text
pub fn render_marquee(texts: &[String]) -> String {
    texts
        .iter()
        .map(|text| format!("<span>{}</span>", escape_html(text)))
        .collect()
}

/// The parts of the public page that come from the Content API
///
/// A region that does not exist on the page reports `None` and is never
/// written.
pub trait SitePage {
    /// Inner markup of the marquee track
    fn marquee_html(&self) -> Option<String>;
    fn set_marquee_html(&mut self, html: String);

    /// Inner markup of the event list
    fn events_html(&self) -> Option<String>;
    fn set_events_html(&mut self, html: String);
}

/// In-memory page, used for prerendering fragments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticPage {
    pub marquee: Option<String>,
    pub events: Option<String>,
}

impl StaticPage {
    /// Page with both regions present and empty
    pub fn new() -> Self {
        Self {
            marquee: Some(String::new()),
            events: Some(String::new()),
        }
    }

    /// Page with both regions present and holding fallback markup
    pub fn with_content(marquee: impl Into<String>, events: impl Into<String>) -> Self {
        Self {
            marquee: Some(marquee.into()),
            events: Some(events.into()),
        }
    }
}

impl SitePage for StaticPage {
    fn marquee_html(&self) -> Option<String> {
        self.marquee.clone()
    }

    fn set_marquee_html(&mut self, html: String) {
        if let Some(marquee) = self.marquee.as_mut() {
            *marquee = html;
        }
    }

    fn events_html(&self) -> Option<String> {
        self.events.clone()
    }

    fn set_events_html(&mut self, html: String) {
        if let Some(events) = self.events.as_mut() {
            *events = html;
        }
    }
}
