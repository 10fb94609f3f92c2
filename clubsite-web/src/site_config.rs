//! Configuration Fetcher
//!
//! Pulls the marquee texts and SoundCloud link from the Content API and
//! applies them to the page. Anything that looks wrong is skipped and the
//! page keeps what it already shows.

use std::sync::atomic::{AtomicBool, Ordering};

use clubsite_common::validation::MARQUEE_TEXT_COUNT;
use serde_json::Value;
use tracing::{info, warn};

use crate::client::ContentSource;
use crate::embed::convert_to_embed_url;
use crate::page::{render_marquee, SitePage};
use crate::playback::{EmbedHost, PlaybackReconciler, PlaybackView, Scheduler};

/// Result of one load attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// Another load was still running
    AlreadyLoading,
    /// Page has no region to write into
    NothingToUpdate,
    /// Server answered with an unexpected body
    InvalidResponse,
    /// Request failed; prior content kept
    Failed,
}

/// Something that owns the embedded player
pub trait EmbedTarget {
    /// Current embed source; `None` when the page has no embed element
    fn embed_source(&self) -> Option<String>;

    /// Point the embed at a new source
    fn reinitialize(&mut self, url: &str);
}

impl<H, S, V> EmbedTarget for PlaybackReconciler<H, S, V>
where
    H: EmbedHost,
    S: Scheduler,
    V: PlaybackView,
{
    fn embed_source(&self) -> Option<String> {
        self.host().source()
    }

    fn reinitialize(&mut self, url: &str) {
        PlaybackReconciler::reinitialize(self, url);
    }
}

/// Embed element of a prerendered page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticEmbed {
    pub source: Option<String>,
}

impl EmbedTarget for StaticEmbed {
    fn embed_source(&self) -> Option<String> {
        self.source.clone()
    }

    fn reinitialize(&mut self, url: &str) {
        self.source = Some(url.to_string());
    }
}

/// Clears the loading flag however the load ends
pub(crate) struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LoadingGuard(flag))
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Default)]
pub struct SiteConfigManager {
    is_loading: AtomicBool,
}

impl SiteConfigManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading.load(Ordering::Acquire)
    }

    /// Fetch `GET /api/siteconfigs` once and apply it
    pub async fn load_configurations<C, P, E>(
        &self,
        source: &C,
        page: &mut P,
        player: &mut E,
    ) -> LoadOutcome
    where
        C: ContentSource,
        P: SitePage,
        E: EmbedTarget,
    {
        let Some(_guard) = LoadingGuard::acquire(&self.is_loading) else {
            return LoadOutcome::AlreadyLoading;
        };

        let body = match source.fetch_site_configs().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to load site configurations, using defaults: {}", e);
                return LoadOutcome::Failed;
            }
        };

        match configs_from_body(&body) {
            Some(configs) => {
                apply_configurations(configs, page, player);
                LoadOutcome::Applied
            }
            None => {
                warn!("Invalid response format from site config API");
                LoadOutcome::InvalidResponse
            }
        }
    }
}

fn configs_from_body(body: &Value) -> Option<&Value> {
    let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);
    match body.get("data") {
        Some(data) if success && !data.is_null() => Some(data),
        _ => None,
    }
}

/// Apply a configuration map (`{marquee?, soundcloud?}`) to the page
pub fn apply_configurations<P, E>(configs: &Value, page: &mut P, player: &mut E)
where
    P: SitePage,
    E: EmbedTarget,
{
    if let Some(texts) = configs.get("marquee").and_then(|m| m.get("texts")) {
        if page.marquee_html().is_some() {
            update_marquee_banner(texts, page);
        }
    }

    let url = configs
        .get("soundcloud")
        .and_then(|s| s.get("url"))
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty());
    if let Some(url) = url {
        update_soundcloud_widget(url, player);
    }
}

fn update_marquee_banner<P: SitePage>(texts: &Value, page: &mut P) {
    let texts: Option<Vec<String>> = texts.as_array().and_then(|items| {
        items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect()
    });

    match texts {
        Some(texts) if texts.len() == MARQUEE_TEXT_COUNT => {
            page.set_marquee_html(render_marquee(&texts));
            info!("Updated marquee banner with CMS content");
        }
        _ => warn!("Invalid marquee texts format, keeping current banner"),
    }
}

fn update_soundcloud_widget<E: EmbedTarget>(url: &str, player: &mut E) {
    let Some(current) = player.embed_source() else {
        return;
    };
    match convert_to_embed_url(url) {
        Some(embed_url) if embed_url != current => {
            player.reinitialize(&embed_url);
            info!(embed_url = %embed_url, "Updated SoundCloud widget with new track");
        }
        Some(_) => {}
        None => warn!(url = %url, "Configured SoundCloud URL is not a SoundCloud link"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::StaticPage;
    use serde_json::json;

    #[derive(Default)]
    struct Embed {
        source: Option<String>,
        reinitialized: Vec<String>,
    }

    impl EmbedTarget for Embed {
        fn embed_source(&self) -> Option<String> {
            self.source.clone()
        }

        fn reinitialize(&mut self, url: &str) {
            self.source = Some(url.to_string());
            self.reinitialized.push(url.to_string());
        }
    }

    fn embed(source: &str) -> Embed {
        Embed {
            source: Some(source.to_string()),
            ..Embed::default()
        }
    }

    #[test]
    fn test_marquee_needs_exactly_four_texts() {
        let mut page = StaticPage::with_content("<span>old</span>", "");
        let mut player = Embed::default();

        apply_configurations(&json!({"marquee": {"texts": ["a", "b", "c"]}}), &mut page, &mut player);
        assert_eq!(page.marquee.as_deref(), Some("<span>old</span>"));

        apply_configurations(
            &json!({"marquee": {"texts": ["a", "b", "c", "d"]}}),
            &mut page,
            &mut player,
        );
        assert_eq!(
            page.marquee.as_deref(),
            Some("<span>a</span><span>b</span><span>c</span><span>d</span>")
        );
    }

    #[test]
    fn test_marquee_arity_matches_server_validation() {
        use clubsite_common::validation::validate_marquee_texts;

        for count in [MARQUEE_TEXT_COUNT - 1, MARQUEE_TEXT_COUNT, MARQUEE_TEXT_COUNT + 1] {
            let texts: Vec<String> = (0..count).map(|i| format!("t{}", i)).collect();
            let mut page = StaticPage::with_content("<span>old</span>", "");
            apply_configurations(&json!({"marquee": {"texts": texts}}), &mut page, &mut Embed::default());

            let applied = page.marquee.as_deref() != Some("<span>old</span>");
            assert_eq!(applied, validate_marquee_texts(Some(&texts)).is_ok(), "count {}", count);
        }
    }

    #[test]
    fn test_marquee_rejects_non_string_texts() {
        let mut page = StaticPage::with_content("<span>old</span>", "");
        apply_configurations(
            &json!({"marquee": {"texts": ["a", 2, "c", "d"]}}),
            &mut page,
            &mut Embed::default(),
        );
        assert_eq!(page.marquee.as_deref(), Some("<span>old</span>"));
    }

    #[test]
    fn test_soundcloud_reinitializes_only_on_change() {
        let track = "https://soundcloud.com/klub/set-01";
        let embed_url = convert_to_embed_url(track).unwrap();
        let mut page = StaticPage::new();

        let mut player = embed("https://w.soundcloud.com/player/?url=old");
        apply_configurations(&json!({"soundcloud": {"url": track}}), &mut page, &mut player);
        assert_eq!(player.reinitialized, vec![embed_url.clone()]);

        apply_configurations(&json!({"soundcloud": {"url": track}}), &mut page, &mut player);
        assert_eq!(player.reinitialized.len(), 1);
    }

    #[test]
    fn test_soundcloud_ignored_without_embed_or_valid_url() {
        let mut page = StaticPage::new();

        let mut absent = Embed::default();
        apply_configurations(
            &json!({"soundcloud": {"url": "https://soundcloud.com/klub/a"}}),
            &mut page,
            &mut absent,
        );
        assert!(absent.reinitialized.is_empty());

        let mut player = embed("https://w.soundcloud.com/player/?url=old");
        apply_configurations(
            &json!({"soundcloud": {"url": "https://example.com/a"}}),
            &mut page,
            &mut player,
        );
        assert!(player.reinitialized.is_empty());
    }

    #[test]
    fn test_body_shape() {
        assert!(configs_from_body(&json!({"success": true, "data": {}})).is_some());
        assert!(configs_from_body(&json!({"success": false, "data": {}})).is_none());
        assert!(configs_from_body(&json!({"success": true})).is_none());
        assert!(configs_from_body(&json!({"data": {}})).is_none());
    }

    #[test]
    fn test_loading_guard_is_exclusive() {
        let flag = AtomicBool::new(false);
        let guard = LoadingGuard::acquire(&flag);
        assert!(guard.is_some());
        assert!(LoadingGuard::acquire(&flag).is_none());
        drop(guard);
        assert!(LoadingGuard::acquire(&flag).is_some());
    }
}
