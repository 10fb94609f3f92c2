//! clubsite-web - prerenders the public site's dynamic fragments
//!
//! Fetches site configuration and upcoming events once and writes the
//! marquee, event list and embed URL as static fallback content.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use clubsite_common::config::{load_toml_config, resolve_api_url};
use clubsite_web::{
    ContentClient, EventsManager, LoadOutcome, SiteConfigManager, StaticEmbed, StaticPage,
};
use tracing::{info, warn};

const MARQUEE_FILE: &str = "marquee.html";
const EVENTS_FILE: &str = "events.html";
const EMBED_FILE: &str = "soundcloud-embed.txt";

#[derive(Debug, Parser)]
#[command(name = "clubsite-web")]
#[command(about = "Prerender club site fragments from the Content API")]
#[command(version)]
struct Args {
    /// Content API base URL
    #[arg(long, env = "CLUBSITE_API_URL")]
    api_url: Option<String>,

    /// Directory the fragments are written to
    #[arg(short, long, default_value = "public/fragments")]
    out_dir: PathBuf,

    /// TOML config file
    #[arg(short, long, env = "CLUBSITE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clubsite_web=info".into()),
        )
        .init();

    info!("Starting clubsite-web v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let toml = load_toml_config(args.config.as_deref()).context("Failed to load config file")?;
    let api_url = resolve_api_url(args.api_url.as_deref(), &toml);
    info!("Content API: {}", api_url);

    let client = ContentClient::new(api_url).context("Failed to create HTTP client")?;

    // Prior content is what the static page ships with; a failed fetch keeps it
    let mut page = StaticPage::new();
    let mut embed = StaticEmbed {
        source: Some(String::new()),
    };

    let configs = SiteConfigManager::new()
        .load_configurations(&client, &mut page, &mut embed)
        .await;
    let events = EventsManager::new().load_events(&client, &mut page).await;

    if configs != LoadOutcome::Applied {
        warn!(outcome = ?configs, "Site configuration not applied");
    }
    if events != LoadOutcome::Applied {
        warn!(outcome = ?events, "Events not rendered");
    }

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;

    if let Some(marquee) = page.marquee.filter(|html| !html.is_empty()) {
        write_fragment(&args.out_dir, MARQUEE_FILE, &marquee)?;
    }
    if let Some(events) = page.events.filter(|html| !html.is_empty()) {
        write_fragment(&args.out_dir, EVENTS_FILE, &events)?;
    }
    if let Some(source) = embed.source.filter(|url| !url.is_empty()) {
        write_fragment(&args.out_dir, EMBED_FILE, &source)?;
    }

    info!("Fragments written to {}", args.out_dir.display());
    Ok(())
}

fn write_fragment(dir: &Path, name: &str, content: &str) -> Result<()> {
    let path = dir.join(name);
    std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}
