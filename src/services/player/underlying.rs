use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;

use super::{PlaybackState, PlayerError, Volume};

/// Capability contract for a concrete playback engine.
///
/// A higher-level player drives any engine through this trait without
/// knowing which platform player sits underneath.
#[async_trait]
pub trait UnderlyingPlayer: Send + Sync {
    /// Name of the engine currently doing the playback
    fn backend_name(&self) -> String;

    /// Start or resume playback
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::NoPlatformPlayer`] when no engine is attached,
    /// or [`PlayerError::Platform`] when the engine refuses.
    async fn play(&self) -> Result<(), PlayerError>;

    /// Pause playback
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::NoPlatformPlayer`] when no engine is attached,
    /// or [`PlayerError::Platform`] when the engine refuses.
    async fn pause(&self) -> Result<(), PlayerError>;

    /// Move the playhead
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::NoPlatformPlayer`] when no engine is attached,
    /// [`PlayerError::InvalidSeekPosition`] past the end of the item, or
    /// [`PlayerError::Platform`] when the engine refuses.
    async fn seek(&self, position: Duration) -> Result<(), PlayerError>;

    /// Change the output volume
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::NoPlatformPlayer`] when no engine is attached,
    /// or [`PlayerError::Platform`] when the engine refuses.
    async fn set_volume(&self, volume: Volume) -> Result<(), PlayerError>;

    /// Change the playback rate
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::NoPlatformPlayer`] when no engine is attached,
    /// [`PlayerError::InvalidRate`] for negative or non-finite rates, or
    /// [`PlayerError::Platform`] when the engine refuses.
    async fn set_rate(&self, rate: f32) -> Result<(), PlayerError>;

    /// Current playhead position
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::NoPlatformPlayer`] when no engine is attached.
    fn current_time(&self) -> Result<Duration, PlayerError>;

    /// Duration of the current item, if known
    fn duration(&self) -> Option<Duration>;

    /// Current playback state
    fn playback_state(&self) -> PlaybackState;

    /// Stream of playback states, starting with the current one
    fn watch_playback_state(&self) -> BoxStream<'static, PlaybackState>;
}
