//! Configuration loading and data folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming the data folder
pub const DATA_DIR_ENV: &str = "CLUBSITE_DATA_DIR";

/// Environment variable naming the Content API base URL
pub const API_URL_ENV: &str = "CLUBSITE_API_URL";

/// Content API the clients talk to when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Database file name inside the data folder
pub const DATABASE_FILE: &str = "clubsite.db";

/// Optional TOML configuration file contents
///
/// Every key is optional; absent keys fall through to environment or
/// compiled defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Folder holding the SQLite database
    pub data_dir: Option<PathBuf>,
    /// Listen address of the content API
    pub bind: Option<String>,
    /// Listen port of the content API
    pub port: Option<u16>,
    /// Token signing secret (generated and persisted when absent)
    pub jwt_secret: Option<String>,
    /// Token lifetime, e.g. `7d`
    pub jwt_expires_in: Option<String>,
    /// Administrator login
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    /// Base URL of the content API, for clients
    pub api_url: Option<String>,
    /// Allowed CORS origins; empty allows any
    pub cors_origins: Vec<String>,
}

impl TomlConfig {
    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }
}

/// Load the TOML configuration
///
/// An explicitly named file must exist and parse. Without one, the platform
/// default location is tried; a missing default file yields an empty config.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) => path,
            None => {
                debug!("No config file found, using environment and defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
    let config = TomlConfig::from_toml_str(&content)?;
    info!("Loaded config file: {}", path.display());
    Ok(config)
}

/// First existing config file in the platform search order
///
/// Linux checks `~/.config/clubsite/config.toml` then
/// `/etc/clubsite/config.toml`; other platforms only the user config dir.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("clubsite").join("config.toml"));
    if let Some(path) = user_config.filter(|p| p.exists()) {
        return Some(path);
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/clubsite/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Data folder resolution, highest priority first:
/// 1. Command-line argument
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default
pub fn resolve_data_dir(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_config: &TomlConfig,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml_config.data_dir {
        return path.clone();
    }

    default_data_dir()
}

/// Content API base URL for the client tools
///
/// `cli_arg` already carries the environment fallback when it comes from
/// clap; then the TOML `api_url`, then [`DEFAULT_API_URL`].
pub fn resolve_api_url(cli_arg: Option<&str>, toml_config: &TomlConfig) -> String {
    cli_arg
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .or_else(|| toml_config.api_url.clone())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// OS-dependent default data folder
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("clubsite"))
        .unwrap_or_else(|| PathBuf::from("./clubsite_data"))
}

/// Database file inside a data folder
pub fn database_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DATABASE_FILE)
}
