//! Platform player implementations

/// In-process simulated platform player
pub mod dummy;

pub use dummy::DummyPlatformPlayer;
