//! # decl-config
//!
//! Layered configuration loading for decl using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DECL_*` prefix, `__` as separator)
//! 2. Project-level `.decl/config.toml`
//! 3. User-level `~/.config/decl/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `DECL_LOAD__MODE` -> `load.mode`,
//! `DECL_OUTPUT__EXPORTED_ONLY` -> `output.exported_only`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use decl_config::DeclConfig;
//!
//! let config = DeclConfig::load().expect("config");
//! println!("load mode: {:?}", config.load.mode);
//! ```

mod error;
mod logging;
mod output;

pub use error::ConfigError;
pub use logging::{LEVELS, LogConfig};
pub use output::{OutputConfig, OutputFormat};

use decl::LoadConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeclConfig {
    #[serde(default)]
    pub load: LoadConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LogConfig,
}

impl DeclConfig {
    /// Load configuration from all sources (TOML files + environment
    /// variables) and validate it.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Figment`] when a source fails to parse or a value has
    /// the wrong shape, [`ConfigError::InvalidValue`] when validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Extract and validate from a caller-built figment.
    ///
    /// # Errors
    ///
    /// Same as [`DeclConfig::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so callers can merge extra providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".decl/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("DECL_").split("__"))
    }

    /// Reject values serde accepts but the binary cannot use.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.logging.is_valid_level() {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!(
                    "'{}' is not one of {}",
                    self.logging.level,
                    LEVELS.join(", ")
                ),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("decl").join("config.toml"))
    }
}
