use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Playback adapter configuration.
///
/// Applied by the adapter every time a platform player is attached.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Volume applied to each newly attached platform player (0.0 - 1.0).
    pub initial_volume: f64,

    /// Playback rate applied to each newly attached platform player. Must be
    /// greater than zero.
    pub default_rate: f32,

    /// Clamp seeks past the end of the item to its duration instead of
    /// rejecting them.
    pub clamp_seek: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            initial_volume: 1.0,
            default_rate: 1.0,
            clamp_seek: false,
        }
    }
}
