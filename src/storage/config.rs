//! Configuration handling for listicles
//!
//! Configuration is stored in `~/.config/listicles/config.toml` (or the
//! platform equivalent). Every key is optional:
//!
//! ```toml
//! data_dir = "/home/me/notes/lists"
//! default_format = "json"
//! default_type = "music"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use serde::Deserialize;
use thiserror::Error;

/// Folder under the home directory used when nothing else is configured
pub const DEFAULT_DATA_DIR_NAME: &str = "listicles-data";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "LISTICLES_DATA_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// User configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where collection files live
    pub data_dir: Option<PathBuf>,

    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// Collection type used by `listicles new` when none is given
    pub default_type: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_format: OutputFormat::Text,
            default_type: "general".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the default location
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific file; a missing file gives defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_type.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_type cannot be empty".to_string(),
            ));
        }
        if matches!(&self.data_dir, Some(dir) if dir.as_os_str().is_empty()) {
            return Err(ConfigError::Invalid("data_dir cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Returns the config directory
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "listicles", "listicles")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns `~/listicles-data`, or a relative `listicles-data` when there
    /// is no home directory
    pub fn default_data_dir() -> PathBuf {
        BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(DEFAULT_DATA_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR_NAME))
    }

    /// Picks the data directory: explicit override, then config file, then default
    ///
    /// The override carries both `--data-dir` and the environment variable;
    /// clap merges them before this is called.
    pub fn resolve_data_dir(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.data_dir.clone())
            .unwrap_or_else(Self::default_data_dir)
    }
}
