//! Underlying player abstraction and its platform-backed adapter.
//!
//! [`UnderlyingPlayer`] is the capability contract a higher-level player
//! drives. [`PlatformPlayerAdapter`] satisfies it by owning a native
//! [`PlatformPlayer`]. Platform notifications may be posted on any thread;
//! they are queued through a [`NotificationSink`] and applied by a single
//! writer, either a [`NotificationMonitor`] task or
//! [`PlatformPlayerAdapter::drain_notifications`].

/// Platform-backed underlying player
pub mod adapter;
/// Platform player implementations
pub mod backends;
/// Playback error types
pub mod error;
/// Cross-thread notification handoff
pub mod notifications;
/// Native platform player seam
pub mod platform;
/// Playback value types
pub mod types;
/// Underlying player capability trait
pub mod underlying;

pub use adapter::{PlatformPlayerAdapter, monitoring::NotificationMonitor};
pub use error::PlayerError;
pub use notifications::NotificationSink;
pub use platform::{PlatformNotification, PlatformPlayer, PlatformStatus};
pub use types::{PlaybackState, Volume};
pub use underlying::UnderlyingPlayer;
