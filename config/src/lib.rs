//! # Configuration Management for Softhaus
//!
//! This crate provides the configuration structures for the soft delete services.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::SoftDeleteSettings;
//!
//! let settings = SoftDeleteSettings::new(true, "archived".to_string(), "restored".to_string(), false);
//! assert_eq!(settings.soft_deleted_text, "archived");
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [soft_delete]
//! not_found_is_not_an_error = false
//! soft_deleted_text = "soft deleted"
//! reset_soft_delete_text = "recovered"
//! read_every_time = true
//! ```
//!
//! Every key is optional, missing keys take the defaults shown above.
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from the path in SOFTHAUS_CONFIG or from softhaus.toml
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./softhaus.toml";
const CONFIG_PATH_VAR: &str = "SOFTHAUS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub soft_delete: SoftDeleteSettings,
}

/// Soft delete service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftDeleteSettings {
    /// Report a missing entity as a successful no-op instead of an error
    pub not_found_is_not_an_error: bool,
    /// Word used in messages after a soft delete, e.g. "soft deleted"
    pub soft_deleted_text: String,
    /// Word used in messages after a reset, e.g. "recovered"
    pub reset_soft_delete_text: String,
    /// Reload navigations from the store on every cascade step
    pub read_every_time: bool,
}

impl Default for SoftDeleteSettings {
    fn default() -> Self {
        Self {
            not_found_is_not_an_error: false,
            soft_deleted_text: "soft deleted".to_string(),
            reset_soft_delete_text: "recovered".to_string(),
            read_every_time: true,
        }
    }
}

impl SoftDeleteSettings {
    pub fn new(
        not_found_is_not_an_error: bool,
        soft_deleted_text: String,
        reset_soft_delete_text: String,
        read_every_time: bool,
    ) -> Self {
        Self {
            not_found_is_not_an_error,
            soft_deleted_text,
            reset_soft_delete_text,
            read_every_time,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.soft_deleted_text.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "soft_delete.soft_deleted_text cannot be empty".to_string(),
            ));
        }
        if self.reset_soft_delete_text.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "soft_delete.reset_soft_delete_text cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from the TOML file named in .env / the environment, or the default path
    ///
    /// Falls back to the defaults when no configuration file exists.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        let config = match env::var(CONFIG_PATH_VAR) {
            Ok(config_path) => Self::from_file(&config_path)?,
            Err(env::VarError::NotPresent) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(DEFAULT_CONFIG_PATH)?
            }
            Err(env::VarError::NotPresent) => Self::default(),
            Err(e) => return Err(e.into()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.soft_delete.validate()
    }
}
