//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/shelf/config.toml)
//! 3. Environment variables (SHELF_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable prefix
const ENV_PREFIX: &str = "SHELF";

/// Default yearly reading goal
pub const DEFAULT_READING_GOAL: u32 = 24;

/// Which durable store backs the library
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One file per entry in the data directory
    #[default]
    File,
    /// A single SQLite database in the data directory
    Sqlite,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "sqlite" => Ok(StorageBackend::Sqlite),
            other => bail!("Unknown storage backend '{}'. Use 'file' or 'sqlite'.", other),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::File => write!(f, "file"),
            StorageBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// A settable configuration key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    DataDir,
    Storage,
    ReadingGoal,
    LogFile,
}

impl ConfigKey {
    /// Every key, in display order
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::DataDir,
        ConfigKey::Storage,
        ConfigKey::ReadingGoal,
        ConfigKey::LogFile,
    ];

    /// Name used in the config file and on the command line
    pub fn name(self) -> &'static str {
        match self {
            ConfigKey::DataDir => "data_dir",
            ConfigKey::Storage => "storage",
            ConfigKey::ReadingGoal => "reading_goal",
            ConfigKey::LogFile => "log_file",
        }
    }
}

impl FromStr for ConfigKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match Self::ALL.into_iter().find(|key| key.name() == s) {
            Some(key) => Ok(key),
            None => {
                let valid: Vec<_> = Self::ALL.iter().map(|key| key.name()).collect();
                bail!(
                    "Unknown configuration key: '{}'\nValid keys: {}",
                    s,
                    valid.join(", ")
                )
            }
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for data storage
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Storage backend
    #[serde(default)]
    pub storage: StorageBackend,

    /// Books to read per year; 0 disables the goal
    #[serde(default = "default_reading_goal")]
    pub reading_goal: u32,

    /// Log file path (logs go to stderr when unset)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage: StorageBackend::default(),
            reading_goal: DEFAULT_READING_GOAL,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (SHELF_DATA_DIR, SHELF_STORAGE, SHELF_READING_GOAL)
    /// 2. Config file (~/.config/shelf/config.toml or SHELF_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = Self::load_file_only(path)?;
        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load only what the config file says, without environment overrides
    ///
    /// Edits that are saved back must start from this, not from `load`.
    pub fn load_file_only(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // SHELF_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // SHELF_STORAGE
        if let Ok(val) = std::env::var(format!("{}_STORAGE", ENV_PREFIX)) {
            match val.parse() {
                Ok(backend) => self.storage = backend,
                Err(e) => tracing::warn!("Ignoring {}_STORAGE: {}", ENV_PREFIX, e),
            }
        }

        // SHELF_READING_GOAL
        if let Ok(val) = std::env::var(format!("{}_READING_GOAL", ENV_PREFIX)) {
            if val.trim().is_empty() {
                self.reading_goal = 0;
            } else if let Ok(goal) = val.trim().parse() {
                self.reading_goal = goal;
            } else {
                tracing::warn!("Ignoring invalid {}_READING_GOAL: {:?}", ENV_PREFIX, val);
            }
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with SHELF_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shelf")
            .join("config.toml")
    }

    /// Current value of `key` as text, `None` when unset
    pub fn get(&self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::DataDir => Some(self.data_dir.display().to_string()),
            ConfigKey::Storage => Some(self.storage.to_string()),
            ConfigKey::ReadingGoal => self.reading_goal().map(|g| g.to_string()),
            ConfigKey::LogFile => self.log_file.as_ref().map(|p| p.display().to_string()),
        }
    }

    /// Set `key` from text
    ///
    /// An empty value or `none` clears `log_file` and disables `reading_goal`.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        let cleared = value.is_empty() || value == "none";
        match key {
            ConfigKey::DataDir => {
                if cleared {
                    bail!("data_dir cannot be empty");
                }
                self.data_dir = PathBuf::from(value);
            }
            ConfigKey::Storage => self.storage = value.parse()?,
            ConfigKey::ReadingGoal => {
                self.reading_goal = if cleared {
                    0
                } else {
                    value.parse().with_context(|| {
                        format!(
                            "Invalid value for reading_goal: '{}'. Use a whole number, or 0 to disable.",
                            value
                        )
                    })?
                };
            }
            ConfigKey::LogFile => {
                self.log_file = (!cleared).then(|| PathBuf::from(value));
            }
        }
        Ok(())
    }

    /// The reading goal, if enabled
    pub fn reading_goal(&self) -> Option<u32> {
        (self.reading_goal > 0).then_some(self.reading_goal)
    }

    /// Get the path to the file holding the catalog (file backend)
    pub fn library_path(&self) -> PathBuf {
        self.data_dir.join(crate::gateway::LIBRARY_KEY)
    }

    /// Get the path to the file holding the profile name (file backend)
    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join(crate::gateway::USER_NAME_KEY)
    }

    /// Get the path to the SQLite database (sqlite backend)
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join("shelf.db")
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shelf")
}

fn default_reading_goal() -> u32 {
    DEFAULT_READING_GOAL
}
