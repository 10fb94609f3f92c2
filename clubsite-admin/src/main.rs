//! clubsite-admin - manage club nights and site configuration from the shell

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use clubsite_admin::{AdminClient, AuthStore, ClientError, EventsStore, SiteConfigsStore, TokenFile};
use clubsite_common::api::LoginRequest;
use clubsite_common::config::{load_toml_config, resolve_api_url};
use clubsite_common::models::{ConfigType, Event, EventDraft, EventFilters};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "clubsite-admin")]
#[command(about = "Administer events and site configuration of the club site")]
#[command(version)]
struct Cli {
    /// Content API base URL
    #[arg(long, global = true, env = "CLUBSITE_API_URL")]
    api_url: Option<String>,

    /// Where the session token is kept between runs
    #[arg(long, global = true, env = "CLUBSITE_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, global = true, env = "CLUBSITE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and store the session token
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "CLUBSITE_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Drop the stored session
    Logout,
    /// Check the stored session with the server
    Verify,
    /// Manage events
    #[command(subcommand)]
    Events(EventsCommand),
    /// Manage site configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
enum EventsCommand {
    /// List events
    List {
        /// Only events from now on
        #[arg(long)]
        upcoming: bool,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        /// Print past events as well as upcoming ones, split
        #[arg(long)]
        split: bool,
    },
    /// Show one event
    Show { id: Uuid },
    /// Create an event
    Create(EventFields),
    /// Update fields of an event
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: EventFields,
    },
    /// Delete an event
    Delete { id: Uuid },
}

#[derive(Debug, Args)]
struct EventFields {
    #[arg(long)]
    title: Option<String>,
    /// ISO-8601 date, e.g. 2025-06-01T22:00:00Z
    #[arg(long)]
    date: Option<String>,
    /// Comma-separated artist names
    #[arg(long, value_delimiter = ',')]
    lineup: Option<Vec<String>>,
    /// Comma-separated tags
    #[arg(long, value_delimiter = ',')]
    tags: Option<Vec<String>>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    active: Option<bool>,
}

impl From<EventFields> for EventDraft {
    fn from(fields: EventFields) -> Self {
        EventDraft {
            title: fields.title,
            date: fields.date,
            lineup: fields.lineup,
            tags: fields.tags,
            description: fields.description,
            is_active: fields.active,
        }
    }
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Show active configuration
    Show {
        /// Only this type (marquee or soundcloud)
        config_type: Option<ConfigType>,
    },
    /// Set the four marquee texts
    Marquee {
        #[arg(num_args = 4, required = true)]
        texts: Vec<String>,
    },
    /// Set the SoundCloud track or playlist URL
    Soundcloud { url: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clubsite_admin=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let toml = load_toml_config(cli.config.as_deref()).context("Failed to load config file")?;
    let api_url = resolve_api_url(cli.api_url.as_deref(), &toml);
    info!("Content API: {}", api_url);

    let token_file = cli
        .token_file
        .map(TokenFile::new)
        .unwrap_or_else(TokenFile::default_location);
    let mut auth = AuthStore::with_token_file(token_file);
    let mut client = AdminClient::new(api_url).context("Failed to create HTTP client")?;
    auth.attach(&mut client);

    match cli.command {
        Command::Login { username, password } => {
            let user = auth
                .login(&mut client, &LoginRequest { username, password })
                .await
                .map_err(|e| failure(e, "Login failed"))?;
            println!("Logged in as {} ({})", user.username, user.role);
        }
        Command::Logout => {
            auth.logout(&mut client).await;
            println!("Logged out");
        }
        Command::Verify => {
            if !auth.verify_token(&mut client).await {
                bail!("Session is not valid; log in again");
            }
            if let Some(user) = auth.user() {
                println!("Logged in as {} ({})", user.username, user.role);
            }
        }
        Command::Events(command) => run_events(command, &client).await?,
        Command::Config(command) => run_config(command, &client).await?,
    }

    Ok(())
}

async fn run_events(command: EventsCommand, client: &AdminClient) -> Result<()> {
    let mut store = EventsStore::new();

    match command {
        EventsCommand::List {
            upcoming,
            tag,
            limit,
            split,
        } => {
            store.set_filters(EventFilters {
                upcoming: upcoming.then(|| "true".to_string()),
                tag,
                limit: limit.map(|l| l.to_string()),
            });
            let filters = store.filters().clone();
            store
                .fetch_events(client, &filters)
                .await
                .map_err(|e| failure(e, "Failed to fetch events"))?;

            if split {
                let now = Utc::now();
                println!("Upcoming:");
                store.upcoming_events(now).into_iter().for_each(print_event_line);
                println!("Past:");
                store.past_events(now).into_iter().for_each(print_event_line);
            } else {
                store.events().iter().for_each(print_event_line);
            }
        }
        EventsCommand::Show { id } => {
            let event = store
                .fetch_event(client, id)
                .await
                .map_err(|e| failure(e, "Failed to fetch event"))?;
            println!("{}", serde_json::to_string_pretty(event)?);
        }
        EventsCommand::Create(fields) => {
            let event = store
                .create_event(client, &fields.into())
                .await
                .map_err(|e| failure(e, "Failed to create event"))?;
            println!("Created {}", event.id);
        }
        EventsCommand::Update { id, fields } => {
            let event = store
                .update_event(client, id, &fields.into())
                .await
                .map_err(|e| failure(e, "Failed to update event"))?;
            println!("Updated {}", event.id);
        }
        EventsCommand::Delete { id } => {
            store
                .delete_event(client, id)
                .await
                .map_err(|e| failure(e, "Failed to delete event"))?;
            println!("Deleted {}", id);
        }
    }

    Ok(())
}

async fn run_config(command: ConfigCommand, client: &AdminClient) -> Result<()> {
    let mut store = SiteConfigsStore::new();

    match command {
        ConfigCommand::Show { config_type } => {
            let fetched = match config_type {
                Some(config_type) => store.fetch_config_by_type(client, config_type).await,
                None => store.fetch_configs(client).await,
            };
            fetched.map_err(|e| failure(e, "Failed to fetch configurations"))?;

            match store.marquee_config() {
                Some(marquee) => println!("marquee: {}", marquee.texts.join(" | ")),
                None if config_type != Some(ConfigType::Soundcloud) => println!("marquee: (not set)"),
                None => {}
            }
            match store.soundcloud_config() {
                Some(soundcloud) => println!("soundcloud: {}", soundcloud.url),
                None if config_type != Some(ConfigType::Marquee) => println!("soundcloud: (not set)"),
                None => {}
            }
        }
        ConfigCommand::Marquee { texts } => {
            store
                .fetch_configs(client)
                .await
                .map_err(|e| failure(e, "Failed to fetch configurations"))?;
            store
                .save_marquee_config(client, texts)
                .await
                .map_err(|e| failure(e, "Failed to save marquee"))?;
            println!("Marquee saved");
        }
        ConfigCommand::Soundcloud { url } => {
            store
                .fetch_configs(client)
                .await
                .map_err(|e| failure(e, "Failed to fetch configurations"))?;
            store
                .save_soundcloud_config(client, url)
                .await
                .map_err(|e| failure(e, "Failed to save SoundCloud link"))?;
            println!("SoundCloud link saved");
        }
    }

    Ok(())
}

/// Operator-facing error: the server's message if it sent one
fn failure(error: ClientError, default: &str) -> anyhow::Error {
    anyhow::anyhow!(error.user_message(default))
}

fn print_event_line(event: &Event) {
    let status = if event.is_active { "" } else { " (inactive)" };
    println!(
        "{}  {}  {}{}",
        event.id,
        event.date.format("%Y-%m-%d %H:%M"),
        event.title,
        status
    );
}
