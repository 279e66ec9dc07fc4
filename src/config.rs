//! Configuration loading and management
//!
//! Handles parsing of `.taskr.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{Error, Result};
use crate::storage::DEFAULT_STORAGE_FILE;
use crate::task::DEFAULT_PRIORITY_WINDOW_DAYS;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE: &str = ".taskr.toml";

const MAX_PRIORITY_WINDOW_DAYS: u32 = 365;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage file locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Task query defaults
    #[serde(default)]
    pub tasks: TasksConfig,
}

/// Storage-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Task collection file, relative to the config directory
    #[serde(default = "default_file")]
    pub file: String,

    /// Metadata file; defaults to a sibling of `file`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_file: Option<String>,
}

fn default_file() -> String {
    DEFAULT_STORAGE_FILE.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file: default_file(),
            metadata_file: None,
        }
    }
}

/// Tasks configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Days ahead that `taskr priority` looks by default
    #[serde(default = "default_priority_window_days")]
    pub priority_window_days: u32,
}

fn default_priority_window_days() -> u32 {
    DEFAULT_PRIORITY_WINDOW_DAYS
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            priority_window_days: default_priority_window_days(),
        }
    }
}

impl Config {
    /// Load configuration from a `.taskr.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `dir`. A missing file yields defaults.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load(&config_path).map_err(|err| {
            warn!(path = %config_path.display(), error = %err, "invalid config");
            err
        })
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Storage file resolved against `dir`
    pub fn storage_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.storage.file)
    }

    /// Metadata file resolved against `dir`, if one is configured
    pub fn metadata_path(&self, dir: &Path) -> Option<PathBuf> {
        self.storage
            .metadata_file
            .as_ref()
            .map(|file| dir.join(file))
    }

    fn validate(&self) -> Result<()> {
        self.storage.validate()?;
        self.tasks.validate()?;
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        if self.file.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "storage.file cannot be empty".to_string(),
            ));
        }
        if let Some(metadata_file) = &self.metadata_file {
            if metadata_file.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "storage.metadata_file cannot be empty".to_string(),
                ));
            }
            if metadata_file.trim() == self.file.trim() {
                return Err(Error::InvalidConfig(
                    "storage.metadata_file must differ from storage.file".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl TasksConfig {
    fn validate(&self) -> Result<()> {
        if self.priority_window_days > MAX_PRIORITY_WINDOW_DAYS {
            return Err(Error::InvalidConfig(format!(
                "tasks.priority_window_days must be <= {MAX_PRIORITY_WINDOW_DAYS}"
            )));
        }
        Ok(())
    }
}
