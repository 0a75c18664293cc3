use std::time::Duration;

/// Errors that can occur while driving an underlying player
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PlayerError {
    /// The adapter has no platform player attached
    #[error("No platform player attached")]
    NoPlatformPlayer,

    /// The platform player rejected or failed an operation
    #[error("Platform player failed: {0}")]
    Platform(String),

    /// Seek position is past the end of the current item
    #[error("Invalid seek position: {position:?} (item length: {length:?})")]
    InvalidSeekPosition {
        /// Requested position
        position: Duration,
        /// Item length (if known)
        length: Option<Duration>,
    },

    /// Playback rate is not a finite number
    #[error("Invalid playback rate: {0}")]
    InvalidRate(f32),

    /// The notification queue is already owned by a running monitor
    #[error("Notification monitor already running")]
    MonitorAlreadyRunning,
}
