//! Console configuration.
//!
//! Loaded from `~/.taskdesk/config.toml` (or `$TASKDESK_HOME/config.toml`).
//! Environment variables override file settings.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Root directory for config, session and logs.
pub fn home_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = std::env::var("TASKDESK_HOME") {
        return Ok(PathBuf::from(path));
    }
    let home = dirs::home_dir().ok_or(ConfigError::NoHome)?;
    Ok(home.join(".taskdesk"))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub console: ConsoleConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConsoleConfig {
    /// User id sent as `created_by` when creating projects
    pub creator_id: i64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { creator_id: 1 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn path() -> Option<PathBuf> {
        home_dir().ok().map(|dir| dir.join("config.toml"))
    }

    /// File settings with environment overrides applied. Anything that had
    /// to be ignored is returned alongside, for logging once a subscriber
    /// is installed.
    pub fn load() -> (Self, Vec<ConfigError>) {
        let mut problems = Vec::new();
        let from_file = match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        };
        let mut config = match from_file {
            Ok(config) => config.unwrap_or_default(),
            Err(e) => {
                problems.push(e);
                Self::default()
            }
        };
        problems.extend(config.apply_overrides(|key| std::env::var(key).ok()));
        (config, problems)
    }

    /// `Ok(None)` when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map(Some)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Vec<ConfigError> {
        let mut problems = Vec::new();
        if let Some(url) = lookup("TASKDESK_API_URL") {
            self.api.base_url = url;
        }
        if let Some(id) = lookup("TASKDESK_CREATOR_ID") {
            match id.trim().parse() {
                Ok(id) => self.console.creator_id = id,
                Err(_) => problems.push(ConfigError::Override {
                    key: "TASKDESK_CREATOR_ID",
                    value: id,
                }),
            }
        }
        if let Some(level) = lookup("TASKDESK_LOG") {
            self.logging.level = level;
        }
        problems
    }
}
