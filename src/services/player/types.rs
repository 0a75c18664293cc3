use std::fmt;
use std::ops::Deref;

/// Playback state as seen by callers of an underlying player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Nothing has been started on the current player, or no player is attached
    #[default]
    Idle,

    /// Playback is waiting for data
    Buffering,

    /// Player is currently playing
    Playing,

    /// Player is paused
    Paused,

    /// The current item played to its end
    Finished,

    /// The platform player reported a failure
    Failed,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlaybackState::Idle => "Idle",
            PlaybackState::Buffering => "Buffering",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
            PlaybackState::Finished => "Finished",
            PlaybackState::Failed => "Failed",
        };
        f.write_str(label)
    }
}

/// Volume of the player
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Volume(f64);

impl Volume {
    /// Full volume
    pub const MAX: Volume = Volume(1.0);

    /// Create a new volume, clamped to `0.0..=1.0`. NaN maps to silence.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Get the volume as a percentage
    pub fn as_percentage(&self) -> f64 {
        self.0 * 100.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::MAX
    }
}

impl Deref for Volume {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<f64> for Volume {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}
