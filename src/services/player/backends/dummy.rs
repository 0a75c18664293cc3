use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::trace;

use crate::services::player::{
    NotificationSink, PlatformNotification, PlatformPlayer, PlatformStatus, PlayerError, Volume,
};

/// Platform player with a simulated clock.
///
/// Time only moves when [`advance`](Self::advance) is called, which makes
/// it suitable for tests and dry runs. Every method may be called from any
/// thread; notifications go to the registered sink immediately.
#[derive(Debug)]
pub struct DummyPlatformPlayer {
    state: Mutex<DummyState>,
}

#[derive(Debug)]
struct DummyState {
    status: PlatformStatus,
    playing: bool,
    stalled: bool,
    position: Duration,
    length: Option<Duration>,
    volume: Volume,
    rate: f32,
    sink: Option<NotificationSink>,
}

impl DummyState {
    fn post(&self, notification: PlatformNotification) {
        if let Some(sink) = &self.sink {
            trace!(?notification, "Dummy player posting notification");
            sink.post(notification);
        }
    }
}

impl DummyPlatformPlayer {
    /// Create a player whose item is ready and `length` long (`None` for a
    /// live item of unknown length).
    pub fn new(length: Option<Duration>) -> Self {
        Self {
            state: Mutex::new(DummyState {
                status: PlatformStatus::ReadyToPlay,
                playing: false,
                stalled: false,
                position: Duration::ZERO,
                length,
                volume: Volume::MAX,
                rate: 1.0,
                sink: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DummyState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the simulated clock is running.
    pub fn is_playing(&self) -> bool {
        let state = self.lock();
        state.playing && !state.stalled
    }

    /// Whether a notification sink is registered.
    pub fn has_sink(&self) -> bool {
        self.lock().sink.is_some()
    }

    /// Move the simulated clock forward by `elapsed * rate` while playing.
    ///
    /// Posts `PlayedToEnd` when the end of the item is reached.
    pub fn advance(&self, elapsed: Duration) {
        let mut state = self.lock();
        if !state.playing || state.stalled {
            return;
        }

        let rate = state.rate;
        state.position += elapsed.mul_f32(rate);

        if let Some(length) = state.length {
            if state.position >= length {
                state.position = length;
                state.playing = false;
                state.post(PlatformNotification::PlayedToEnd);
            }
        }
    }

    /// Simulate an unrecoverable item failure.
    pub fn fail(&self, reason: &str) {
        let mut state = self.lock();
        state.status = PlatformStatus::Failed(reason.to_string());
        state.playing = false;
        state.post(PlatformNotification::FailedToPlayToEnd(reason.to_string()));
    }

    /// Simulate running out of buffered data.
    pub fn stall(&self) {
        let mut state = self.lock();
        state.stalled = true;
        state.post(PlatformNotification::PlaybackStalled);
    }

    /// Simulate buffering catching up after a stall.
    pub fn recover(&self) {
        let mut state = self.lock();
        state.stalled = false;
        state.post(PlatformNotification::LikelyToKeepUp);
    }

    /// Simulate a playhead discontinuity initiated outside the adapter,
    /// e.g. a remote-control scrub.
    pub fn jump_to(&self, position: Duration) {
        let mut state = self.lock();
        state.position = position;
        state.post(PlatformNotification::TimeJumped(position));
    }

    /// Simulate the platform reporting a new item status.
    pub fn set_status(&self, status: PlatformStatus) {
        let mut state = self.lock();
        if matches!(status, PlatformStatus::Failed(_)) {
            state.playing = false;
        }
        state.status = status.clone();
        state.post(PlatformNotification::StatusChanged(status));
    }

    /// Simulate loading a fresh item after a failure. Only the status change
    /// is posted; the new length is left for the observer to query.
    pub fn reload(&self, length: Option<Duration>) {
        let mut state = self.lock();
        state.status = PlatformStatus::ReadyToPlay;
        state.playing = false;
        state.stalled = false;
        state.position = Duration::ZERO;
        state.length = length;
        state.post(PlatformNotification::StatusChanged(PlatformStatus::ReadyToPlay));
    }

    /// Simulate a rate change initiated outside the adapter. The value is
    /// reported as-is, without validation.
    pub fn rate_changed(&self, rate: f32) {
        let mut state = self.lock();
        if rate.is_finite() && rate >= 0.0 {
            state.rate = rate;
        }
        state.post(PlatformNotification::RateChanged(rate));
    }

    /// Simulate the item's duration becoming known.
    pub fn set_length(&self, length: Option<Duration>) {
        let mut state = self.lock();
        state.length = length;
        state.post(PlatformNotification::DurationChanged(length));
    }
}

impl PlatformPlayer for DummyPlatformPlayer {
    fn name(&self) -> &str {
        "dummy"
    }

    fn status(&self) -> PlatformStatus {
        self.lock().status.clone()
    }

    fn play(&self) -> Result<(), PlayerError> {
        let mut state = self.lock();
        if let PlatformStatus::Failed(reason) = &state.status {
            return Err(PlayerError::Platform(reason.clone()));
        }

        if state.length.is_some_and(|length| state.position >= length) {
            state.position = Duration::ZERO;
        }
        state.playing = true;
        Ok(())
    }

    fn pause(&self) -> Result<(), PlayerError> {
        self.lock().playing = false;
        Ok(())
    }

    fn seek(&self, position: Duration) -> Result<(), PlayerError> {
        let mut state = self.lock();
        if let Some(length) = state.length {
            if position > length {
                return Err(PlayerError::Platform(format!(
                    "seek to {position:?} past end {length:?}"
                )));
            }
        }

        state.position = position;
        Ok(())
    }

    fn current_time(&self) -> Duration {
        self.lock().position
    }

    fn duration(&self) -> Option<Duration> {
        self.lock().length
    }

    fn volume(&self) -> Volume {
        self.lock().volume
    }

    fn set_volume(&self, volume: Volume) -> Result<(), PlayerError> {
        self.lock().volume = volume;
        Ok(())
    }

    fn rate(&self) -> f32 {
        self.lock().rate
    }

    fn set_rate(&self, rate: f32) -> Result<(), PlayerError> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(PlayerError::InvalidRate(rate));
        }

        self.lock().rate = rate;
        Ok(())
    }

    fn set_notification_sink(&self, sink: Option<NotificationSink>) {
        self.lock().sink = sink;
    }
}
