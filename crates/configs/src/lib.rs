//! # configs
//!
//! Layered settings for the forum binaries, plus tracing setup.
//!
//! Sources, later ones winning:
//! 1. built-in defaults
//! 2. `forum.toml` in the working directory (optional)
//! 3. `FORUM__SECTION__KEY` environment variables, after `.env` is loaded

mod logging;

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

pub use logging::init_tracing;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Console,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedSettings {
    /// Write the bundled threads and comments into empty storage.
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
    pub seed: SeedSettings,
}

impl Settings {
    /// Loads `.env`, then `forum.toml`, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }
        Self::load_from(Path::new("forum.toml"))
    }

    /// Same layering as [`Settings::load`] with an explicit file path and
    /// without reading `.env`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings: Settings = Self::builder()?
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("FORUM").separator("__"))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        info!(backend = ?settings.storage.backend, data_dir = %settings.storage.data_dir.display(), "settings loaded");
        Ok(settings)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("storage.backend", "file")?
            .set_default("storage.data_dir", "./data")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "console")?
            .set_default("seed.enabled", true)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.backend == StorageBackend::File && self.storage.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                key: "storage.data_dir",
                reason: "must not be empty for the file backend".into(),
            });
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "logging.level",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}
