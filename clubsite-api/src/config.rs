//! Server configuration
//!
//! Resolution order for every setting, highest priority first:
//! command line, environment variable, TOML config file, compiled default.
//! clap covers the first two tiers.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use clubsite_common::api::{parse_expires_in, AdminCredentials};
use clubsite_common::config::{resolve_data_dir, TomlConfig, DATA_DIR_ENV};
use clubsite_common::{Error, Result};
use tracing::warn;

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_TOKEN_TTL: &str = "7d";

/// Command-line arguments for clubsite-api
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "clubsite-api")]
#[command(about = "Content API for the club website")]
#[command(version)]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "CLUBSITE_BIND")]
    pub bind: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "CLUBSITE_PORT")]
    pub port: Option<u16>,

    /// Folder holding the SQLite database
    #[arg(short, long, env = "CLUBSITE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// TOML config file (default: platform config dir)
    #[arg(short, long, env = "CLUBSITE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Token signing secret; generated and stored in the database when absent
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Token lifetime, e.g. 3600, 12h, 7d
    #[arg(long, env = "JWT_EXPIRES_IN")]
    pub jwt_expires_in: Option<String>,

    /// Administrator login name
    #[arg(long, env = "ADMIN_USERNAME")]
    pub admin_username: Option<String>,

    /// Administrator password
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,
}

/// Fully resolved server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub jwt_secret: Option<String>,
    pub token_ttl: Duration,
    pub admin: AdminCredentials,
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Merge arguments over the TOML file over defaults
    pub fn resolve(args: &Args, toml: &TomlConfig) -> Result<Self> {
        let expires_in = args
            .jwt_expires_in
            .clone()
            .or_else(|| toml.jwt_expires_in.clone())
            .unwrap_or_else(|| DEFAULT_TOKEN_TTL.to_string());
        let token_ttl = parse_expires_in(&expires_in).ok_or_else(|| {
            Error::Config(format!("Invalid token lifetime: {:?}", expires_in))
        })?;

        let admin = AdminCredentials {
            username: args
                .admin_username
                .clone()
                .or_else(|| toml.admin_username.clone())
                .unwrap_or_default(),
            password: args
                .admin_password
                .clone()
                .or_else(|| toml.admin_password.clone())
                .unwrap_or_default(),
        };
        if admin.username.is_empty() || admin.password.is_empty() {
            warn!("No administrator configured; every login will be rejected");
        }

        Ok(ServerConfig {
            bind: args
                .bind
                .clone()
                .or_else(|| toml.bind.clone())
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            port: args.port.or(toml.port).unwrap_or(DEFAULT_PORT),
            data_dir: resolve_data_dir(args.data_dir.as_deref(), DATA_DIR_ENV, toml),
            jwt_secret: args
                .jwt_secret
                .clone()
                .or_else(|| toml.jwt_secret.clone())
                .filter(|s| !s.is_empty()),
            token_ttl,
            admin,
            cors_origins: toml.cors_origins.clone(),
        })
    }
}
