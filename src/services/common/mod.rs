//! Common utilities shared by services

/// Reactive property cells for fine-grained state updates
pub mod property;

pub use property::Property;
