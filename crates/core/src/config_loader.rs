use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads application configuration by merging defaults, TOML, environment variables, and JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files exist but cannot be parsed.
    pub fn load() -> Result<AppConfig> {
        Self::load_from("config/Config.toml")
    }

    /// Loads configuration using a specific TOML file as the primary source.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files exist but cannot be parsed.
    pub fn load_from(toml_path: impl AsRef<Path>) -> Result<AppConfig> {
        let config: AppConfig = Self::figment(toml_path.as_ref()).extract()?;
        tracing::debug!(path = %toml_path.as_ref().display(), "Loaded configuration");
        Ok(config)
    }

    fn figment(toml_path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(toml_path))
            .merge(Env::prefixed("PLAYWATCH_").split("__"))
            .join(Json::file("config/Config.json"))
    }
}
