//! Underplay - uniform playback over native platform media players.
//!
//! A higher-level player drives playback through the [`UnderlyingPlayer`]
//! trait. [`PlatformPlayerAdapter`] implements it by owning a native
//! [`PlatformPlayer`] and turning the notifications that player posts
//! (possibly from foreign threads) into reactive state.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use underplay::config::PlayerConfig;
//! use underplay::services::player::{
//!     NotificationMonitor, PlatformPlayerAdapter, UnderlyingPlayer,
//!     backends::DummyPlatformPlayer,
//! };
//!
//! # async fn run() -> Result<(), underplay::services::PlayerError> {
//! let platform = Arc::new(DummyPlatformPlayer::new(Some(Duration::from_secs(30))));
//! let adapter = Arc::new(PlatformPlayerAdapter::with_player(
//!     platform,
//!     PlayerConfig::default(),
//! ));
//! let _monitor = NotificationMonitor::start(&adapter)?;
//!
//! adapter.play().await?;
//! println!("{}", adapter.playback_state());
//! # Ok(())
//! # }
//! ```
//!
//! [`UnderlyingPlayer`]: services::UnderlyingPlayer
//! [`PlatformPlayerAdapter`]: services::PlatformPlayerAdapter
//! [`PlatformPlayer`]: services::PlatformPlayer

/// Configuration schema definitions and validation.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Playback services.
pub mod services;

/// Logging setup.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use crate::core::{Result, UnderplayError};
