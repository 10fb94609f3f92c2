//! clubsite-api - content API server for the club website
//!
//! Owns the SQLite content database and serves it over JSON.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use clubsite_api::config::{Args, ServerConfig};
use clubsite_api::{build_router, AppState, AuthSettings};
use clubsite_common::api::auth::load_jwt_secret;
use clubsite_common::config::{database_path, load_toml_config};
use clubsite_common::db::init_database;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clubsite_api=info,tower_http=info".into()),
        )
        .init();

    // Build identification first, before any database delay
    info!(
        "Starting club site Content API (clubsite-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let toml = load_toml_config(args.config.as_deref()).context("Failed to load config file")?;
    let config = ServerConfig::resolve(&args, &toml).context("Invalid configuration")?;

    let db_path = database_path(&config.data_dir);
    info!("Database path: {}", db_path.display());
    let pool = init_database(&db_path)
        .await
        .context("Failed to open database")?;

    let secret = match &config.jwt_secret {
        Some(secret) => {
            info!("Using configured token secret");
            secret.clone()
        }
        None => {
            let secret = load_jwt_secret(&pool)
                .await
                .context("Failed to load token secret")?;
            info!("Using token secret stored in database");
            secret
        }
    };

    let auth = AuthSettings::new(secret, config.token_ttl, config.admin.clone());
    let state = AppState::new(pool, auth).with_cors_origins(config.cors_origins.clone());
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.bind, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.bind, config.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("clubsite-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
