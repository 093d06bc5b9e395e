//! Configuration module for tagdex
//!
//! Manages application configuration: the default corpus location and the
//! autocomplete tuning knobs. Configuration is stored in the user's config
//! directory (`~/.config/tagdex/config.toml` on Linux).

use crate::suggest::SuggestConfig;
use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default number of suggestions per query
pub const DEFAULT_LIMIT: usize = 7;

const fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TagdexConfig {
    /// Corpus CSV to load when no `--corpus` flag is given
    #[serde(default)]
    pub corpus_path: Option<PathBuf>,

    /// Default number of suggestions per query
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,

    /// Autocomplete scoring knobs (fuzzy threshold, scan cap, bonus caps)
    #[serde(default)]
    pub suggest: SuggestConfig,
}

impl Default for TagdexConfig {
    fn default() -> Self {
        Self {
            corpus_path: None,
            limit: DEFAULT_LIMIT,
            quiet: false,
            suggest: SuggestConfig::default(),
        }
    }
}

impl TagdexConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::Message("Could not determine config directory".to_string())
        })?;

        Ok(config_dir.join("tagdex").join("config.toml"))
    }

    /// Load configuration from file, creating default if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        let settings = Config::builder()
            .add_source(File::from(config_path).format(FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the
    /// configuration cannot be serialized to TOML, or the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(&config_path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }
}
