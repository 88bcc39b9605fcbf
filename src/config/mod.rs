//! Configuration module for vewd
//!
//! Server location, export naming, grid geometry and keybinds. Configuration
//! is stored in the user's config directory as TOML.

use crate::controller::GridLayout;
use crate::keybinds::KeybindConfig;
use crate::media::StorageType;
use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn default_server_url() -> String {
    "http://127.0.0.1:8188".to_string()
}

fn default_export_folder() -> String {
    "vewd".to_string()
}

fn default_filename_prefix() -> String {
    "vewd_".to_string()
}

const fn default_upload_storage() -> StorageType {
    StorageType::Input
}

const fn default_inline_columns() -> usize {
    4
}

const fn default_inline_rows() -> usize {
    2
}

const fn default_fullscreen_columns() -> usize {
    6
}

const fn default_fullscreen_rows() -> usize {
    4
}

const fn default_notice_ttl_secs() -> u64 {
    3
}

/// Widget configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WidgetConfig {
    /// Base URL of the host server
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Folder sent with export and save requests
    #[serde(default = "default_export_folder")]
    pub export_folder: String,

    /// Filename prefix sent with export and save requests
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,

    /// Storage area uploads are placed in
    #[serde(default = "default_upload_storage")]
    pub upload_storage: StorageType,

    #[serde(default = "default_inline_columns")]
    pub inline_columns: usize,

    #[serde(default = "default_inline_rows")]
    pub inline_rows: usize,

    #[serde(default = "default_fullscreen_columns")]
    pub fullscreen_columns: usize,

    #[serde(default = "default_fullscreen_rows")]
    pub fullscreen_rows: usize,

    /// Export the tagged set whenever a tag toggle leaves it non-empty
    #[serde(default)]
    pub auto_export: bool,

    /// State database location; defaults to the user's data directory
    #[serde(default)]
    pub state_db: Option<PathBuf>,

    /// Seconds a notice stays visible
    #[serde(default = "default_notice_ttl_secs")]
    pub notice_ttl_secs: u64,

    #[serde(default)]
    pub keybinds: KeybindConfig,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            export_folder: default_export_folder(),
            filename_prefix: default_filename_prefix(),
            upload_storage: default_upload_storage(),
            inline_columns: default_inline_columns(),
            inline_rows: default_inline_rows(),
            fullscreen_columns: default_fullscreen_columns(),
            fullscreen_rows: default_fullscreen_rows(),
            auto_export: false,
            state_db: None,
            notice_ttl_secs: default_notice_ttl_secs(),
            keybinds: KeybindConfig::default(),
        }
    }
}

impl WidgetConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("vewd").join("config.toml"))
    }

    /// Load configuration from the default location, creating it if missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or created.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created, the
    /// configuration cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string).map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Resolved state database location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no path is configured and the system data
    /// directory cannot be determined.
    pub fn state_db_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.state_db {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine data directory".to_string()))?;
        Ok(data_dir.join("vewd").join("state"))
    }

    #[must_use]
    pub const fn grid(&self) -> GridLayout {
        GridLayout {
            inline_columns: self.inline_columns,
            inline_rows: self.inline_rows,
            fullscreen_columns: self.fullscreen_columns,
            fullscreen_rows: self.fullscreen_rows,
        }
    }

    #[must_use]
    pub const fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.notice_ttl_secs)
    }
}
