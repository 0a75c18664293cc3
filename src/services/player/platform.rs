use std::{fmt, time::Duration};

use super::{PlayerError, Volume, notifications::NotificationSink};

/// Readiness reported by a platform player for its current item
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlatformStatus {
    /// The item has not been loaded yet
    #[default]
    Unknown,

    /// The item can be played
    ReadyToPlay,

    /// The item can no longer be played
    Failed(String),
}

/// Notifications a platform player posts about its current item.
///
/// Platform players may post these from any thread, including threads
/// owned by the media framework.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformNotification {
    /// The item's readiness changed
    StatusChanged(PlatformStatus),

    /// The item played to its end time
    PlayedToEnd,

    /// The item failed to play to its end time
    FailedToPlayToEnd(String),

    /// Playback stalled waiting for data
    PlaybackStalled,

    /// Enough data is buffered to continue after a stall
    LikelyToKeepUp,

    /// The item's current time changed discontinuously
    TimeJumped(Duration),

    /// The playback rate changed outside of an adapter call
    RateChanged(f32),

    /// The item's duration became known or changed
    DurationChanged(Option<Duration>),
}

/// A native platform media player.
///
/// This is the seam to whatever engine actually decodes and renders media.
/// Implementations own their own threading; every method must be callable
/// from any thread.
pub trait PlatformPlayer: Send + Sync + fmt::Debug {
    /// Short identifier of the platform engine
    fn name(&self) -> &str;

    /// Readiness of the current item
    fn status(&self) -> PlatformStatus;

    /// Start or resume playback at the current rate
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::Platform`] when the engine cannot comply.
    fn play(&self) -> Result<(), PlayerError>;

    /// Pause playback
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::Platform`] when the engine cannot comply.
    fn pause(&self) -> Result<(), PlayerError>;

    /// Move the playhead of the current item
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::Platform`] when the engine cannot comply.
    fn seek(&self, position: Duration) -> Result<(), PlayerError>;

    /// Current playhead position
    fn current_time(&self) -> Duration;

    /// Duration of the current item, if known
    fn duration(&self) -> Option<Duration>;

    /// Current output volume
    fn volume(&self) -> Volume;

    /// Change the output volume
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::Platform`] when the engine cannot comply.
    fn set_volume(&self, volume: Volume) -> Result<(), PlayerError>;

    /// Current playback rate
    fn rate(&self) -> f32;

    /// Change the playback rate
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::InvalidRate`] for rates the engine cannot
    /// play, or [`PlayerError::Platform`] when it cannot comply.
    fn set_rate(&self, rate: f32) -> Result<(), PlayerError>;

    /// Register (or clear, with `None`) the observer that receives this
    /// player's notifications. Replaces any previously registered sink.
    fn set_notification_sink(&self, sink: Option<NotificationSink>);
}
