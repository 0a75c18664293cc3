/// Shared reactive primitives
pub mod common;
/// Underlying player abstraction and platform adapters
pub mod player;

pub use player::{
    NotificationMonitor, PlatformPlayer, PlatformPlayerAdapter, PlaybackState, PlayerError,
    UnderlyingPlayer, Volume,
};
