use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

pub const APP_NAME: &str = "pbolt";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Defaults written by `pbolt init`. Every field can be overridden by a flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the vault
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<Url>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    /// Path to the user's armored private key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the pbolt directory (~/.pbolt)
    pub pbolt_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the pbolt directory path (custom or default ~/.pbolt)
    pub fn pbolt_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Write a new config file, replacing any existing one when `force` is set
    pub fn init(
        custom_path: Option<PathBuf>,
        config: AppConfig,
        force: bool,
    ) -> Result<Self, StateError> {
        let pbolt_dir = Self::pbolt_dir(custom_path)?;
        let config_path = pbolt_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() && !force {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&pbolt_dir)?;
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            pbolt_dir,
            config_path,
            config,
        })
    }

    /// Load existing state from the pbolt directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let pbolt_dir = Self::pbolt_dir(custom_path)?;
        let config_path = pbolt_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            pbolt_dir,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("pbolt directory not initialized. Run 'pbolt init' first")]
    NotInitialized,

    #[error("pbolt already initialized, pass --force to overwrite")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
