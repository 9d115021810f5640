//! Configuration loading
//!
//! The service constructs one [`Config`] value at process start and passes it
//! into every component that needs it; nothing reads ambient environment
//! state after startup.
//!
//! Config file resolution priority order:
//! 1. Command-line argument (highest priority)
//! 2. `CANVASS_CONFIG` environment variable
//! 3. Platform config directory (`~/.config/canvass/config.toml` on Linux)
//! 4. Compiled defaults (no file)
//!
//! Channel credentials and the admin token may additionally be supplied via
//! environment variables, which take priority over the TOML file.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Telegram channel settings shared by notification and delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

/// On-disk configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub bind_address: Option<String>,
    pub database_path: Option<PathBuf>,
    pub admin_token: Option<String>,
    pub telegram: Option<TelegramConfig>,
}

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to
    pub bind_address: String,
    /// SQLite database file path
    pub database_path: PathBuf,
    /// Bearer token guarding admin routes; `None` disables the check
    pub admin_token: Option<String>,
    /// Channel credentials; `None` leaves delivery unconfigured
    pub telegram: Option<TelegramConfig>,
}

impl Config {
    /// Load configuration with CLI → ENV → TOML → default resolution
    pub fn load(cli_config_path: Option<&Path>) -> Result<Config> {
        let file = match resolve_config_file(cli_config_path) {
            Some(path) => read_toml_config(&path)?,
            None => TomlConfig::default(),
        };

        let mut config = Config {
            bind_address: file
                .bind_address
                .unwrap_or_else(|| "127.0.0.1:5780".to_string()),
            database_path: file.database_path.unwrap_or_else(default_database_path),
            admin_token: file.admin_token,
            telegram: file.telegram,
        };

        // Environment variables override file values for secrets
        if let Ok(token) = std::env::var("CANVASS_ADMIN_TOKEN") {
            if config.admin_token.is_some() {
                warn!("Admin token found in both environment and TOML; using environment");
            }
            config.admin_token = Some(token);
        }
        if let (Ok(bot_token), Ok(chat_id)) = (
            std::env::var("CANVASS_TELEGRAM_BOT_TOKEN"),
            std::env::var("CANVASS_TELEGRAM_CHAT_ID"),
        ) {
            if config.telegram.is_some() {
                warn!("Telegram credentials found in both environment and TOML; using environment");
            }
            config.telegram = Some(TelegramConfig { bot_token, chat_id });
        }

        // Empty strings behave as unset
        if matches!(config.admin_token.as_deref(), Some(t) if t.trim().is_empty()) {
            config.admin_token = None;
        }
        if matches!(
            &config.telegram,
            Some(t) if t.bot_token.trim().is_empty() || t.chat_id.trim().is_empty()
        ) {
            config.telegram = None;
        }

        Ok(config)
    }
}

/// Locate the config file, if any
fn resolve_config_file(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var("CANVASS_CONFIG") {
        return Some(PathBuf::from(path));
    }

    // Priority 3: Platform config directory
    let candidate = dirs::config_dir().map(|d| d.join("canvass").join("config.toml"))?;
    if candidate.exists() {
        Some(candidate)
    } else {
        None
    }
}

/// Parse a TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// OS-dependent default database path
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("canvass"))
        .unwrap_or_else(|| PathBuf::from("./canvass_data"))
        .join("canvass.db")
}
