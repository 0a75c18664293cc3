pub(crate) mod monitoring;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info, warn};

use crate::config::PlayerConfig;
use crate::services::common::Property;

use super::notifications::{self, Envelope, EnvelopeReceiver, EnvelopeSender, NotificationSink};
use super::{
    PlatformNotification, PlatformPlayer, PlatformStatus, PlaybackState, PlayerError,
    UnderlyingPlayer, Volume,
};

/// Underlying player backed by a native platform player.
///
/// The adapter owns the platform player handle for its own lifetime and
/// exposes playback state as reactive properties. Platform notifications
/// are queued by a [`NotificationSink`] and applied by a single writer,
/// never on the thread that posted them.
///
/// Slot changes, notification application and control calls are
/// serialized by one transition lock, always taken before the slot lock.
#[derive(Debug)]
pub struct PlatformPlayerAdapter {
    transitions: Mutex<()>,
    player: RwLock<Option<Arc<dyn PlatformPlayer>>>,
    generation: AtomicU64,
    notifications_tx: EnvelopeSender,
    notifications_rx: Mutex<Option<EnvelopeReceiver>>,
    config: PlayerConfig,

    /// Current playback state
    pub playback_state: Property<PlaybackState>,
    /// Last known playhead position (seeks and time jumps)
    pub position: Property<Duration>,
    /// Duration of the current item, if known
    pub duration: Property<Option<Duration>>,
    /// Current output volume
    pub volume: Property<Volume>,
    /// Current playback rate
    pub rate: Property<f32>,
    /// Most recent platform failure, cleared when a new player is attached
    pub last_error: Property<Option<String>>,
}

impl Default for PlatformPlayerAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformPlayerAdapter {
    /// Create an adapter with no platform player and default settings.
    pub fn new() -> Self {
        Self::with_config(PlayerConfig::default())
    }

    /// Create an adapter with no platform player.
    pub fn with_config(config: PlayerConfig) -> Self {
        let (notifications_tx, notifications_rx) = notifications::channel();

        Self {
            transitions: Mutex::new(()),
            player: RwLock::new(None),
            generation: AtomicU64::new(0),
            notifications_tx,
            notifications_rx: Mutex::new(Some(notifications_rx)),
            playback_state: Property::new(PlaybackState::Idle),
            position: Property::new(Duration::ZERO),
            duration: Property::new(None),
            volume: Property::new(Volume::new(config.initial_volume)),
            rate: Property::new(config.default_rate),
            last_error: Property::new(None),
            config,
        }
    }

    /// Create an adapter that owns `player` from the start.
    pub fn with_player(player: Arc<dyn PlatformPlayer>, config: PlayerConfig) -> Self {
        let adapter = Self::with_config(config);
        adapter.set_player(Some(player));
        adapter
    }

    /// The attached platform player, if any.
    pub fn player(&self) -> Option<Arc<dyn PlatformPlayer>> {
        self.player
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a platform player is attached.
    pub fn has_player(&self) -> bool {
        self.player
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Attach `player` (or detach with `None`), releasing the previous one.
    pub fn set_player(&self, player: Option<Arc<dyn PlatformPlayer>>) {
        drop(self.replace_player(player));
    }

    /// Detach and return the current platform player.
    pub fn take_player(&self) -> Option<Arc<dyn PlatformPlayer>> {
        self.replace_player(None)
    }

    /// Attach `player` (or detach with `None`) and return the previous one.
    ///
    /// The previous player stops delivering notifications to this adapter;
    /// anything it already queued is discarded.
    pub fn replace_player(
        &self,
        player: Option<Arc<dyn PlatformPlayer>>,
    ) -> Option<Arc<dyn PlatformPlayer>> {
        let _transition = self.lock_transitions();
        let mut slot = self.player.write().unwrap_or_else(PoisonError::into_inner);
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        if let Some(previous) = slot.as_ref() {
            previous.set_notification_sink(None);
        }

        if let Some(next) = player.as_ref() {
            next.set_notification_sink(Some(NotificationSink::new(
                generation,
                self.notifications_tx.clone(),
            )));
            self.apply_defaults(next.as_ref());
            info!(backend = next.name(), generation, "Attached platform player");
        } else {
            debug!(generation, "Platform player detached");
        }

        let previous = std::mem::replace(&mut *slot, player);
        let current = slot.clone();
        drop(slot);

        self.reset_state(current.as_deref());
        previous
    }

    /// Apply every queued notification on the calling thread.
    ///
    /// Returns how many notifications changed adapter state; stale ones from
    /// replaced players are discarded without counting.
    ///
    /// The queue is unbounded. An adapter that is neither drained nor
    /// monitored keeps every notification its player posts.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::MonitorAlreadyRunning`] when a
    /// [`NotificationMonitor`](super::NotificationMonitor) owns the queue.
    pub fn drain_notifications(&self) -> Result<usize, PlayerError> {
        let mut guard = self
            .notifications_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(rx) = guard.as_mut() else {
            return Err(PlayerError::MonitorAlreadyRunning);
        };

        let mut applied = 0;
        loop {
            match rx.try_recv() {
                Ok(envelope) => {
                    if self.apply(envelope) {
                        applied += 1;
                    }
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }

        Ok(applied)
    }

    pub(crate) fn take_notification_receiver(&self) -> Option<EnvelopeReceiver> {
        self.notifications_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub(crate) fn restore_notification_receiver(&self, rx: EnvelopeReceiver) {
        *self
            .notifications_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(rx);
    }

    /// Apply one queued notification. Returns `false` for stale or invalid ones.
    pub(crate) fn apply(&self, envelope: Envelope) -> bool {
        let _transition = self.lock_transitions();
        let current = self.generation.load(Ordering::Acquire);
        if envelope.generation != current {
            debug!(
                stale = envelope.generation,
                current, "Discarding notification from replaced player"
            );
            return false;
        }

        debug!(notification = ?envelope.notification, "Applying platform notification");

        match envelope.notification {
            PlatformNotification::StatusChanged(PlatformStatus::Unknown) => {}
            PlatformNotification::StatusChanged(PlatformStatus::ReadyToPlay) => {
                if let Some(player) = self.player() {
                    self.duration.set(player.duration());
                }
                self.playback_state.update(|state| {
                    if *state == PlaybackState::Failed {
                        *state = PlaybackState::Idle;
                        true
                    } else {
                        false
                    }
                });
                self.last_error.set(None);
            }
            PlatformNotification::StatusChanged(PlatformStatus::Failed(reason))
            | PlatformNotification::FailedToPlayToEnd(reason) => {
                warn!(%reason, "Platform player failed");
                self.last_error.set(Some(reason));
                self.playback_state.set(PlaybackState::Failed);
            }
            PlatformNotification::PlayedToEnd => {
                if let Some(length) = self.duration.get() {
                    self.position.set(length);
                }
                self.playback_state.set(PlaybackState::Finished);
            }
            PlatformNotification::PlaybackStalled => {
                Self::transition(
                    &self.playback_state,
                    PlaybackState::Playing,
                    PlaybackState::Buffering,
                );
            }
            PlatformNotification::LikelyToKeepUp => {
                Self::transition(
                    &self.playback_state,
                    PlaybackState::Buffering,
                    PlaybackState::Playing,
                );
            }
            PlatformNotification::TimeJumped(position) => {
                self.position.set(position);
            }
            PlatformNotification::RateChanged(rate) if !rate.is_finite() || rate < 0.0 => {
                warn!(rate, "Ignoring invalid rate from platform player");
                return false;
            }
            PlatformNotification::RateChanged(rate) => {
                self.rate.set(rate);
                if rate == 0.0 {
                    Self::transition(
                        &self.playback_state,
                        PlaybackState::Playing,
                        PlaybackState::Paused,
                    );
                }
            }
            PlatformNotification::DurationChanged(length) => {
                self.duration.set(length);
            }
        }

        true
    }

    fn transition(state: &Property<PlaybackState>, from: PlaybackState, to: PlaybackState) {
        state.update(|current| {
            if *current == from {
                *current = to;
                true
            } else {
                false
            }
        });
    }

    fn apply_defaults(&self, player: &dyn PlatformPlayer) {
        if let Err(e) = player.set_volume(Volume::new(self.config.initial_volume)) {
            warn!(error = %e, "Failed to apply initial volume");
        }
        if let Err(e) = player.set_rate(self.config.default_rate) {
            warn!(error = %e, "Failed to apply default rate");
        }
    }

    fn reset_state(&self, player: Option<&dyn PlatformPlayer>) {
        let Some(player) = player else {
            self.playback_state.set(PlaybackState::Idle);
            self.position.set(Duration::ZERO);
            self.duration.set(None);
            self.volume.set(Volume::new(self.config.initial_volume));
            self.rate.set(self.config.default_rate);
            self.last_error.set(None);
            return;
        };

        self.position.set(player.current_time());
        self.duration.set(player.duration());
        self.volume.set(player.volume());
        self.rate.set(player.rate());

        if let PlatformStatus::Failed(reason) = player.status() {
            self.last_error.set(Some(reason));
            self.playback_state.set(PlaybackState::Failed);
        } else {
            self.last_error.set(None);
            self.playback_state.set(PlaybackState::Idle);
        }
    }

    fn lock_transitions(&self) -> MutexGuard<'_, ()> {
        self.transitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn require_player(&self) -> Result<Arc<dyn PlatformPlayer>, PlayerError> {
        self.player().ok_or(PlayerError::NoPlatformPlayer)
    }

    /// Hold the transition lock for the duration of a control call so a
    /// concurrent slot change cannot land between the platform call and the
    /// state update.
    fn lock_player(&self) -> Result<(MutexGuard<'_, ()>, Arc<dyn PlatformPlayer>), PlayerError> {
        let transition = self.lock_transitions();
        let player = self.require_player()?;
        Ok((transition, player))
    }

    fn report<T>(&self, result: Result<T, PlayerError>) -> Result<T, PlayerError> {
        result.inspect_err(|e| {
            warn!(error = %e, "Platform player call failed");
            self.last_error.set(Some(e.to_string()));
            self.playback_state.set(PlaybackState::Failed);
        })
    }
}

impl Drop for PlatformPlayerAdapter {
    fn drop(&mut self) {
        let slot = self.player.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(player) = slot.take() {
            player.set_notification_sink(None);
        }
    }
}

#[async_trait]
impl UnderlyingPlayer for PlatformPlayerAdapter {
    fn backend_name(&self) -> String {
        self.player()
            .map(|player| player.name().to_string())
            .unwrap_or_else(|| "none".to_string())
    }

    async fn play(&self) -> Result<(), PlayerError> {
        let (_transition, player) = self.lock_player()?;
        self.report(player.play())?;
        self.playback_state.set(PlaybackState::Playing);
        Ok(())
    }

    async fn pause(&self) -> Result<(), PlayerError> {
        let (_transition, player) = self.lock_player()?;
        self.report(player.pause())?;
        self.playback_state.set(PlaybackState::Paused);
        Ok(())
    }

    async fn seek(&self, position: Duration) -> Result<(), PlayerError> {
        let (_transition, player) = self.lock_player()?;

        let target = match player.duration() {
            Some(length) if position > length && self.config.clamp_seek => length,
            Some(length) if position > length => {
                return Err(PlayerError::InvalidSeekPosition {
                    position,
                    length: Some(length),
                });
            }
            _ => position,
        };

        self.report(player.seek(target))?;
        self.position.set(target);
        Self::transition(
            &self.playback_state,
            PlaybackState::Finished,
            PlaybackState::Paused,
        );
        Ok(())
    }

    async fn set_volume(&self, volume: Volume) -> Result<(), PlayerError> {
        let (_transition, player) = self.lock_player()?;
        self.report(player.set_volume(volume))?;
        self.volume.set(volume);
        Ok(())
    }

    async fn set_rate(&self, rate: f32) -> Result<(), PlayerError> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(PlayerError::InvalidRate(rate));
        }

        let (_transition, player) = self.lock_player()?;
        self.report(player.set_rate(rate))?;
        self.rate.set(rate);
        if rate == 0.0 {
            Self::transition(
                &self.playback_state,
                PlaybackState::Playing,
                PlaybackState::Paused,
            );
        }
        Ok(())
    }

    fn current_time(&self) -> Result<Duration, PlayerError> {
        Ok(self.require_player()?.current_time())
    }

    fn duration(&self) -> Option<Duration> {
        self.player().and_then(|player| player.duration())
    }

    fn playback_state(&self) -> PlaybackState {
        self.playback_state.get()
    }

    fn watch_playback_state(&self) -> BoxStream<'static, PlaybackState> {
        self.playback_state.watch().boxed()
    }
}

#[cfg(test)]
mod tests;
