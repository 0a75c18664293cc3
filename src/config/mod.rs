//! Configuration schema definitions and validation.
//!
//! Defines the configuration structure for underplay. All configurations
//! are serializable to/from TOML format and every field has a default, so
//! an empty file is a valid configuration.

mod general;
mod loading;
mod paths;
mod player;

#[cfg(test)]
mod tests;

pub use general::{GeneralConfig, LogLevel};
pub use paths::ConfigPaths;
pub use player::PlayerConfig;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Main configuration structure for underplay.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Playback adapter settings.
    #[serde(default)]
    pub player: PlayerConfig,
}
