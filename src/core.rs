use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error types for the underplay application layer.
///
/// Covers configuration loading and validation. Playback failures live in
/// [`PlayerError`](crate::services::player::PlayerError).
#[derive(Error, Debug)]
pub enum UnderplayError {
    /// Configuration validation error
    #[error("configuration validation failed for '{field}': {details}")]
    ConfigValidation {
        /// Dotted path of the offending field
        field: String,
        /// Validation error details
        details: String,
    },

    /// I/O operation error
    #[error("I/O error on '{path}': {details}")]
    IoError {
        /// Path where I/O error occurred
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// Standard I/O operation error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error with location context
    #[error("failed to parse TOML at '{location}': {details}")]
    TomlParseError {
        /// Location of TOML being parsed (file path or "string")
        location: String,
        /// Parse error details
        details: String,
    },

    /// TOML serialization error
    #[error("failed to serialize config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// A specialized `Result` type for underplay operations.
pub type Result<T> = std::result::Result<T, UnderplayError>;

impl UnderplayError {
    /// Creates a TOML parsing error with optional file path context.
    pub fn toml_parse(error: impl std::fmt::Display, path: Option<&Path>) -> Self {
        let location = match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                clean_path.to_string_lossy().to_string()
            }
            None => "string".to_string(),
        };

        UnderplayError::TomlParseError {
            location,
            details: error.to_string(),
        }
    }

    /// Creates a validation error for the given config field.
    pub fn validation(field: &str, details: impl Into<String>) -> Self {
        UnderplayError::ConfigValidation {
            field: field.to_string(),
            details: details.into(),
        }
    }
}
