use std::{fs, path::Path};

use tracing::debug;

use super::Config;
use crate::{Result, UnderplayError};

impl Config {
    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is invalid, or
    /// a value fails validation.
    pub fn load(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| UnderplayError::IoError {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|e| UnderplayError::toml_parse(e, Some(path)))?;
        config.validate()?;

        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or a value fails validation.
    pub fn from_toml_str(content: &str) -> Result<Config> {
        let config: Config =
            toml::from_str(content).map_err(|e| UnderplayError::toml_parse(e, None))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the main configuration file, falling back to defaults when it
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be loaded.
    pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => super::ConfigPaths::main_config()?,
        };

        if !path.exists() {
            debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Config::default());
        }

        Self::load(&path)
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`UnderplayError::ConfigValidation`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        let player = &self.player;

        if !player.default_rate.is_finite() || player.default_rate <= 0.0 {
            return Err(UnderplayError::validation(
                "player.default_rate",
                format!("must be a positive number, got {}", player.default_rate),
            ));
        }

        if !(0.0..=1.0).contains(&player.initial_volume) {
            return Err(UnderplayError::validation(
                "player.initial_volume",
                format!("must be within 0.0..=1.0, got {}", player.initial_volume),
            ));
        }

        Ok(())
    }
}
