#![allow(clippy::unwrap_used)]

use std::sync::atomic::AtomicBool;
use std::sync::mpsc as std_mpsc;
use std::sync::{Arc, Mutex, Weak};
use std::thread;
use std::time::Duration;

use futures::StreamExt;
use tokio::time::timeout;

use super::*;
use crate::services::player::{NotificationMonitor, backends::DummyPlatformPlayer};

const SECOND: Duration = Duration::from_secs(1);

/// Platform player whose `duration` can be made to block until released,
/// holding the caller inside the adapter.
#[derive(Debug)]
struct BlockingPlatformPlayer {
    armed: AtomicBool,
    entered: Mutex<std_mpsc::Sender<()>>,
    release: Mutex<std_mpsc::Receiver<()>>,
    sink: Mutex<Option<NotificationSink>>,
}

impl BlockingPlatformPlayer {
    fn new() -> (Self, std_mpsc::Receiver<()>, std_mpsc::Sender<()>) {
        let (entered_tx, entered_rx) = std_mpsc::channel();
        let (release_tx, release_rx) = std_mpsc::channel();
        let player = Self {
            armed: AtomicBool::new(false),
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
            sink: Mutex::new(None),
        };
        (player, entered_rx, release_tx)
    }

    fn post(&self, notification: PlatformNotification) {
        if let Some(sink) = self.sink.lock().unwrap().as_ref() {
            sink.post(notification);
        }
    }
}

impl PlatformPlayer for BlockingPlatformPlayer {
    fn name(&self) -> &str {
        "blocking"
    }

    fn status(&self) -> PlatformStatus {
        PlatformStatus::ReadyToPlay
    }

    fn play(&self) -> Result<(), PlayerError> {
        Ok(())
    }

    fn pause(&self) -> Result<(), PlayerError> {
        Ok(())
    }

    fn seek(&self, _position: Duration) -> Result<(), PlayerError> {
        Ok(())
    }

    fn current_time(&self) -> Duration {
        Duration::ZERO
    }

    fn duration(&self) -> Option<Duration> {
        if self.armed.swap(false, Ordering::AcqRel) {
            self.entered.lock().unwrap().send(()).unwrap();
            self.release.lock().unwrap().recv().unwrap();
        }
        Some(SECOND * 99)
    }

    fn volume(&self) -> Volume {
        Volume::MAX
    }

    fn set_volume(&self, _volume: Volume) -> Result<(), PlayerError> {
        Ok(())
    }

    fn rate(&self) -> f32 {
        1.0
    }

    fn set_rate(&self, _rate: f32) -> Result<(), PlayerError> {
        Ok(())
    }

    fn set_notification_sink(&self, sink: Option<NotificationSink>) {
        *self.sink.lock().unwrap() = sink;
    }
}

fn dummy(length_secs: u64) -> (Arc<DummyPlatformPlayer>, Arc<dyn PlatformPlayer>) {
    let player = Arc::new(DummyPlatformPlayer::new(Some(SECOND * length_secs as u32)));
    let handle: Arc<dyn PlatformPlayer> = player.clone();
    (player, handle)
}

#[test]
fn new_adapter_has_no_player() {
    let adapter = PlatformPlayerAdapter::new();

    assert!(adapter.player().is_none());
    assert!(!adapter.has_player());
    assert_eq!(adapter.playback_state.get(), PlaybackState::Idle);
    assert_eq!(adapter.backend_name(), "none");
}

#[test]
fn assigned_player_is_returned_unchanged() {
    let adapter = PlatformPlayerAdapter::new();
    let (_, handle) = dummy(10);

    adapter.set_player(Some(handle.clone()));

    let stored = adapter.player().unwrap();
    assert!(Arc::ptr_eq(&stored, &handle));
    assert_eq!(adapter.backend_name(), "dummy");
}

#[test]
fn replacing_player_releases_previous() {
    let adapter = PlatformPlayerAdapter::new();
    let (first, handle) = dummy(10);
    let weak: Weak<DummyPlatformPlayer> = Arc::downgrade(&first);
    adapter.set_player(Some(handle));
    drop(first);

    assert!(weak.upgrade().is_some());

    let (_, second) = dummy(5);
    adapter.set_player(Some(second));

    assert!(weak.upgrade().is_none());
}

#[test]
fn replace_player_hands_back_detached_previous() {
    let adapter = PlatformPlayerAdapter::new();
    let (first, handle) = dummy(10);
    adapter.set_player(Some(handle.clone()));
    assert!(first.has_sink());

    let (second, second_handle) = dummy(5);
    let previous = adapter.replace_player(Some(second_handle)).unwrap();

    assert!(Arc::ptr_eq(&previous, &handle));
    assert!(!first.has_sink());
    assert!(second.has_sink());
    assert_eq!(adapter.duration.get(), Some(SECOND * 5));
}

#[test]
fn take_player_unsets_slot() {
    let adapter = PlatformPlayerAdapter::new();
    let (_, handle) = dummy(10);
    adapter.set_player(Some(handle.clone()));

    let taken = adapter.take_player().unwrap();

    assert!(Arc::ptr_eq(&taken, &handle));
    assert!(adapter.player().is_none());
    assert_eq!(adapter.duration.get(), None);
}

#[test]
fn dropping_adapter_releases_player_and_sink() {
    let (player, handle) = dummy(10);
    let adapter = PlatformPlayerAdapter::with_player(handle, PlayerConfig::default());
    assert_eq!(Arc::strong_count(&player), 2);

    drop(adapter);

    assert_eq!(Arc::strong_count(&player), 1);
    assert!(!player.has_sink());
}

#[tokio::test]
async fn operations_without_player_fail() {
    let adapter = PlatformPlayerAdapter::new();

    assert_eq!(adapter.play().await, Err(PlayerError::NoPlatformPlayer));
    assert_eq!(adapter.pause().await, Err(PlayerError::NoPlatformPlayer));
    assert_eq!(
        adapter.seek(SECOND).await,
        Err(PlayerError::NoPlatformPlayer)
    );
    assert_eq!(
        adapter.set_volume(Volume::new(0.5)).await,
        Err(PlayerError::NoPlatformPlayer)
    );
    assert_eq!(adapter.set_rate(1.0).await, Err(PlayerError::NoPlatformPlayer));
    assert_eq!(adapter.current_time(), Err(PlayerError::NoPlatformPlayer));
    assert_eq!(adapter.duration(), None);
    assert_eq!(adapter.playback_state.get(), PlaybackState::Idle);
}

#[tokio::test]
async fn usable_as_underlying_player() {
    let (player, handle) = dummy(10);
    let engine: Box<dyn UnderlyingPlayer> = Box::new(PlatformPlayerAdapter::with_player(
        handle,
        PlayerConfig::default(),
    ));

    engine.play().await.unwrap();
    player.advance(SECOND * 3);

    assert_eq!(engine.playback_state(), PlaybackState::Playing);
    assert_eq!(engine.current_time().unwrap(), SECOND * 3);
    assert_eq!(engine.duration(), Some(SECOND * 10));

    engine.pause().await.unwrap();
    assert_eq!(engine.playback_state(), PlaybackState::Paused);
    assert!(!player.is_playing());
}

#[tokio::test]
async fn config_defaults_are_applied_on_attach() {
    let config = PlayerConfig {
        initial_volume: 0.5,
        default_rate: 1.5,
        clamp_seek: false,
    };
    let (player, handle) = dummy(10);

    let adapter = PlatformPlayerAdapter::with_player(handle, config);

    assert_eq!(*player.volume(), 0.5);
    assert_eq!(player.rate(), 1.5);
    assert_eq!(*adapter.volume.get(), 0.5);
    assert_eq!(adapter.rate.get(), 1.5);
}

#[tokio::test]
async fn seek_past_end_is_rejected() {
    let (_, handle) = dummy(10);
    let adapter = PlatformPlayerAdapter::with_player(handle, PlayerConfig::default());

    let result = adapter.seek(SECOND * 11).await;

    assert_eq!(
        result,
        Err(PlayerError::InvalidSeekPosition {
            position: SECOND * 11,
            length: Some(SECOND * 10),
        })
    );
    assert_eq!(adapter.playback_state.get(), PlaybackState::Idle);
}

#[tokio::test]
async fn seek_past_end_clamps_when_configured() {
    let config = PlayerConfig {
        clamp_seek: true,
        ..PlayerConfig::default()
    };
    let (player, handle) = dummy(10);
    let adapter = PlatformPlayerAdapter::with_player(handle, config);

    adapter.seek(SECOND * 30).await.unwrap();

    assert_eq!(player.current_time(), SECOND * 10);
    assert_eq!(adapter.position.get(), SECOND * 10);
}

#[tokio::test]
async fn seek_after_finish_moves_to_paused() {
    let (player, handle) = dummy(2);
    let adapter = PlatformPlayerAdapter::with_player(handle, PlayerConfig::default());
    adapter.play().await.unwrap();
    player.advance(SECOND * 2);
    adapter.drain_notifications().unwrap();
    assert_eq!(adapter.playback_state.get(), PlaybackState::Finished);

    adapter.seek(SECOND).await.unwrap();

    assert_eq!(adapter.playback_state.get(), PlaybackState::Paused);
    assert_eq!(adapter.position.get(), SECOND);
}

#[tokio::test]
async fn invalid_rate_is_rejected_before_platform_call() {
    let adapter = PlatformPlayerAdapter::new();

    assert_eq!(
        adapter.set_rate(f32::NAN).await.unwrap_err().to_string(),
        "Invalid playback rate: NaN"
    );
    assert_eq!(adapter.set_rate(-1.0).await, Err(PlayerError::InvalidRate(-1.0)));
}

#[tokio::test]
async fn zero_rate_pauses_playing_player() {
    let (_, handle) = dummy(10);
    let adapter = PlatformPlayerAdapter::with_player(handle, PlayerConfig::default());
    adapter.play().await.unwrap();

    adapter.set_rate(0.0).await.unwrap();

    assert_eq!(adapter.rate.get(), 0.0);
    assert_eq!(adapter.playback_state.get(), PlaybackState::Paused);
}

#[tokio::test]
async fn platform_failure_is_recorded() {
    let (player, handle) = dummy(10);
    let adapter = PlatformPlayerAdapter::with_player(handle, PlayerConfig::default());
    player.fail("network lost");
    adapter.drain_notifications().unwrap();

    let result = adapter.play().await;

    assert_eq!(
        result,
        Err(PlayerError::Platform("network lost".to_string()))
    );
    assert_eq!(adapter.playback_state.get(), PlaybackState::Failed);
    assert!(adapter.last_error.get().is_some());
}

#[test]
fn attaching_failed_player_reports_failure() {
    let player = Arc::new(DummyPlatformPlayer::new(None));
    player.fail("unsupported codec");

    let adapter = PlatformPlayerAdapter::with_player(player, PlayerConfig::default());

    assert_eq!(adapter.playback_state.get(), PlaybackState::Failed);
    assert_eq!(
        adapter.last_error.get(),
        Some("unsupported codec".to_string())
    );
}

#[tokio::test]
async fn notifications_from_other_thread_wait_for_drain() {
    let (player, handle) = dummy(3);
    let adapter = PlatformPlayerAdapter::with_player(handle, PlayerConfig::default());
    adapter.play().await.unwrap();

    let remote = player.clone();
    thread::spawn(move || remote.advance(SECOND * 5))
        .join()
        .unwrap();

    assert_eq!(adapter.playback_state.get(), PlaybackState::Playing);

    assert_eq!(adapter.drain_notifications().unwrap(), 1);
    assert_eq!(adapter.playback_state.get(), PlaybackState::Finished);
    assert_eq!(adapter.position.get(), SECOND * 3);
}

#[tokio::test]
async fn stall_and_recovery_toggle_buffering() {
    let (player, handle) = dummy(10);
    let adapter = PlatformPlayerAdapter::with_player(handle, PlayerConfig::default());
    adapter.play().await.unwrap();

    player.stall();
    adapter.drain_notifications().unwrap();
    assert_eq!(adapter.playback_state.get(), PlaybackState::Buffering);

    player.recover();
    adapter.drain_notifications().unwrap();
    assert_eq!(adapter.playback_state.get(), PlaybackState::Playing);
}

#[test]
fn time_jump_and_duration_change_update_state() {
    let (player, handle) = dummy(10);
    let adapter = PlatformPlayerAdapter::with_player(handle, PlayerConfig::default());

    player.jump_to(SECOND * 4);
    player.set_length(Some(SECOND * 20));

    assert_eq!(adapter.drain_notifications().unwrap(), 2);
    assert_eq!(adapter.position.get(), SECOND * 4);
    assert_eq!(adapter.duration.get(), Some(SECOND * 20));
}

#[tokio::test]
async fn notifications_from_replaced_player_are_discarded() {
    let (first, first_handle) = dummy(10);
    let adapter = PlatformPlayerAdapter::with_player(first_handle, PlayerConfig::default());
    adapter.play().await.unwrap();
    first.stall();

    let (_, second) = dummy(5);
    adapter.set_player(Some(second));

    assert_eq!(adapter.drain_notifications().unwrap(), 0);
    assert_eq!(adapter.playback_state.get(), PlaybackState::Idle);
}

#[tokio::test]
async fn monitor_applies_notifications() {
    let (player, handle) = dummy(2);
    let adapter = Arc::new(PlatformPlayerAdapter::with_player(
        handle,
        PlayerConfig::default(),
    ));
    let _monitor = NotificationMonitor::start(&adapter).unwrap();
    adapter.play().await.unwrap();

    let mut states = adapter.watch_playback_state();
    assert_eq!(states.next().await, Some(PlaybackState::Playing));

    let remote = player.clone();
    thread::spawn(move || remote.advance(SECOND * 2))
        .join()
        .unwrap();

    let next = timeout(SECOND, states.next()).await.unwrap();
    assert_eq!(next, Some(PlaybackState::Finished));
}

#[tokio::test]
async fn monitor_owns_queue_exclusively() {
    let adapter = Arc::new(PlatformPlayerAdapter::new());
    let _monitor = NotificationMonitor::start(&adapter).unwrap();

    assert_eq!(
        NotificationMonitor::start(&adapter).unwrap_err(),
        PlayerError::MonitorAlreadyRunning
    );
    assert_eq!(
        adapter.drain_notifications(),
        Err(PlayerError::MonitorAlreadyRunning)
    );
}

#[tokio::test]
async fn monitor_stops_when_adapter_dropped() {
    let (player, handle) = dummy(10);
    let adapter = Arc::new(PlatformPlayerAdapter::with_player(
        handle,
        PlayerConfig::default(),
    ));
    let monitor = NotificationMonitor::start(&adapter).unwrap();

    drop(adapter);

    timeout(SECOND, monitor).await.unwrap().unwrap();
    assert!(!player.has_sink());
}

#[tokio::test]
async fn aborted_monitor_returns_queue() {
    let (player, handle) = dummy(10);
    let adapter = Arc::new(PlatformPlayerAdapter::with_player(
        handle,
        PlayerConfig::default(),
    ));
    let monitor = NotificationMonitor::start(&adapter).unwrap();

    monitor.abort();
    assert!(monitor.await.unwrap_err().is_cancelled());

    player.jump_to(SECOND * 3);
    assert_eq!(adapter.drain_notifications(), Ok(1));
    assert_eq!(adapter.position.get(), SECOND * 3);

    let restarted = NotificationMonitor::start(&adapter);
    assert!(restarted.is_ok());
}

#[test]
fn ready_status_recovers_failed_adapter() {
    let (player, handle) = dummy(10);
    let adapter = PlatformPlayerAdapter::with_player(handle, PlayerConfig::default());
    player.fail("decoder error");
    adapter.drain_notifications().unwrap();
    assert_eq!(adapter.playback_state.get(), PlaybackState::Failed);

    player.reload(Some(SECOND * 20));

    assert_eq!(adapter.drain_notifications().unwrap(), 1);
    assert_eq!(adapter.playback_state.get(), PlaybackState::Idle);
    assert_eq!(adapter.last_error.get(), None);
    assert_eq!(adapter.duration.get(), Some(SECOND * 20));
}

#[tokio::test]
async fn failed_status_notification_fails_adapter() {
    let (player, handle) = dummy(10);
    let adapter = PlatformPlayerAdapter::with_player(handle, PlayerConfig::default());
    adapter.play().await.unwrap();

    player.set_status(PlatformStatus::Failed("output device lost".to_string()));

    assert_eq!(adapter.drain_notifications().unwrap(), 1);
    assert_eq!(adapter.playback_state.get(), PlaybackState::Failed);
    assert_eq!(
        adapter.last_error.get(),
        Some("output device lost".to_string())
    );
}

#[tokio::test]
async fn external_rate_change_is_applied() {
    let (player, handle) = dummy(10);
    let adapter = PlatformPlayerAdapter::with_player(handle, PlayerConfig::default());
    adapter.play().await.unwrap();

    player.rate_changed(0.5);
    adapter.drain_notifications().unwrap();
    assert_eq!(adapter.rate.get(), 0.5);
    assert_eq!(adapter.playback_state.get(), PlaybackState::Playing);

    player.rate_changed(0.0);
    adapter.drain_notifications().unwrap();
    assert_eq!(adapter.rate.get(), 0.0);
    assert_eq!(adapter.playback_state.get(), PlaybackState::Paused);
}

#[test]
fn invalid_rate_notifications_are_ignored() {
    let (player, handle) = dummy(10);
    let adapter = PlatformPlayerAdapter::with_player(handle, PlayerConfig::default());

    player.rate_changed(f32::NAN);
    player.rate_changed(-2.0);
    player.rate_changed(f32::INFINITY);

    assert_eq!(adapter.drain_notifications().unwrap(), 0);
    assert_eq!(adapter.rate.get(), 1.0);
}

#[tokio::test]
async fn detaching_restores_configured_volume_and_rate() {
    let config = PlayerConfig {
        initial_volume: 0.8,
        default_rate: 1.25,
        clamp_seek: false,
    };
    let (_, handle) = dummy(10);
    let adapter = PlatformPlayerAdapter::with_player(handle, config);
    adapter.set_volume(Volume::new(0.3)).await.unwrap();
    adapter.set_rate(2.0).await.unwrap();

    adapter.take_player();

    assert_eq!(*adapter.volume.get(), 0.8);
    assert_eq!(adapter.rate.get(), 1.25);
}

#[test]
fn replacement_during_notification_is_not_overwritten() {
    let (blocking, entered, release) = BlockingPlatformPlayer::new();
    let blocking = Arc::new(blocking);
    let adapter = PlatformPlayerAdapter::with_player(blocking.clone(), PlayerConfig::default());

    blocking.armed.store(true, Ordering::Release);
    blocking.post(PlatformNotification::StatusChanged(PlatformStatus::ReadyToPlay));

    let failed = Arc::new(DummyPlatformPlayer::new(None));
    failed.fail("unsupported codec");

    thread::scope(|scope| {
        let drain = scope.spawn(|| adapter.drain_notifications());
        entered.recv().unwrap();

        let replace = scope.spawn(|| adapter.set_player(Some(failed.clone())));
        thread::sleep(Duration::from_millis(50));
        release.send(()).unwrap();

        drain.join().unwrap().unwrap();
        replace.join().unwrap();
    });

    assert_eq!(adapter.playback_state.get(), PlaybackState::Failed);
    assert_eq!(
        adapter.last_error.get(),
        Some("unsupported codec".to_string())
    );
    assert_eq!(adapter.duration.get(), None);
}
