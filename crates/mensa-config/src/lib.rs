//! # mensa-config
//!
//! Layered configuration loading for Mensa using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`MENSA_*` prefix, `__` as separator)
//! 2. Project-level `mensa.toml`
//! 3. User-level `~/.config/mensa/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `MENSA_NUTRISLICE__BASE_URL` -> `nutrislice.base_url`,
//! `MENSA_SYNC__DAYS_AHEAD` -> `sync.days_ahead`, etc. The `__` (double
//! underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use mensa_config::MensaConfig;
//!
//! let config = MensaConfig::load_with_dotenv().expect("config");
//! if config.nutrislice.is_configured() {
//!     println!("upstream: {}", config.nutrislice.base_url);
//! }
//! ```

mod database;
mod error;
mod nutrislice;
mod sync;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use nutrislice::NutrisliceConfig;
pub use sync::SyncConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MensaConfig {
    #[serde(default)]
    pub nutrislice: NutrisliceConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

impl MensaConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or merge.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// This is the typical entry point for the CLI.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or merge.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can layer additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from("mensa.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("MENSA_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("mensa").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_loads() {
        let config = MensaConfig::default();
        assert!(!config.nutrislice.is_configured());
        assert!(config.sync.halls.is_empty());
        assert_eq!(config.sync.days_ahead, 7);
        assert_eq!(config.sync.retention_days, 7);
    }

    #[test]
    fn toml_then_env_precedence() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "mensa.toml",
                r#"
                [nutrislice]
                base_url = "https://menus.example.com/menu/api"

                [sync]
                days_ahead = 3

                [[sync.halls]]
                slug = "north-commons"
                name = "North Commons"
                "#,
            )?;
            jail.set_env("MENSA_SYNC__DAYS_AHEAD", "5");

            let config: MensaConfig = MensaConfig::figment().extract()?;
            assert_eq!(
                config.nutrislice.base_url,
                "https://menus.example.com/menu/api"
            );
            // env beats the TOML file
            assert_eq!(config.sync.days_ahead, 5);
            assert_eq!(config.sync.halls.len(), 1);
            assert_eq!(config.sync.halls[0].slug, "north-commons");
            Ok(())
        });
    }
}
