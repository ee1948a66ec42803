//! Configuration loading and management
//!
//! Handles parsing of `taskboard.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
use crate::task::{DEFAULT_CATEGORY, DEFAULT_PRIORITY};

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "taskboard.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Task document storage configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Defaults applied to new tasks
    #[serde(default)]
    pub tasks: TasksConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Verbose request and store logging
    #[serde(default)]
    pub debug: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            debug: false,
        }
    }
}

/// What the store does when reading or writing the document fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log the failure; reads fall back to an empty list, writes are dropped.
    #[default]
    Log,
    /// Propagate the failure to the caller.
    Fail,
}

/// Task document storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the JSON document; relative paths resolve against the config file
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    /// Write the seed tasks when the document does not exist yet
    #[serde(default = "default_true")]
    pub seed: bool,

    /// Replace the document via temp file + rename instead of overwriting in place
    #[serde(default = "default_true")]
    pub atomic_writes: bool,

    /// Hold an advisory lock on `<path>.lock` across read/modify/write
    #[serde(default = "default_true")]
    pub file_lock: bool,

    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,

    #[serde(default)]
    pub on_error: ErrorPolicy,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("tasks.json")
}

fn default_true() -> bool {
    true
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            seed: true,
            atomic_writes: true,
            file_lock: true,
            lock_timeout_ms: default_lock_timeout_ms(),
            on_error: ErrorPolicy::default(),
        }
    }
}

/// Defaults applied to new tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasksConfig {
    #[serde(default = "default_priority")]
    pub default_priority: String,

    #[serde(default = "default_category")]
    pub default_category: String,
}

fn default_priority() -> String {
    DEFAULT_PRIORITY.to_string()
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            default_priority: default_priority(),
            default_category: default_category(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.validate()?;
        if let Some(base) = path.parent() {
            config.store.path = resolve_relative(base, &config.store.path);
        }
        Ok(config)
    }

    /// Defaults for a config file that will live at `path`
    pub fn default_at(path: &Path) -> Self {
        let mut config = Self::default();
        if let Some(base) = path.parent() {
            config.store.path = resolve_relative(base, &config.store.path);
        }
        config
    }

    /// Load `taskboard.toml` from `dir`, or return defaults
    ///
    /// An unreadable or invalid file is logged and ignored.
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }

        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Save configuration to a file, creating its directory if needed
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(Error::InvalidConfig("server.host cannot be empty".to_string()));
        }
        if self.store.path.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("store.path cannot be empty".to_string()));
        }
        if self.store.lock_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "store.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        if self.tasks.default_priority.is_empty() {
            return Err(Error::InvalidConfig(
                "tasks.default_priority cannot be empty".to_string(),
            ));
        }
        if self.tasks.default_category.is_empty() {
            return Err(Error::InvalidConfig(
                "tasks.default_category cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn resolve_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() || base.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
