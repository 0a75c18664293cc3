//! Unit tests for config module
//!
//! Tests configuration defaults, parsing and validation.
//! No filesystem dependencies - all in-memory.

#![allow(clippy::panic, clippy::unwrap_used)]

use crate::{
    UnderplayError,
    config::{Config, LogLevel, PlayerConfig},
};

#[test]
fn config_default() {
    let config = Config::default();

    assert_eq!(config.general.log_level, LogLevel::Info);
    assert_eq!(config.player, PlayerConfig::default());
    assert_eq!(config.player.initial_volume, 1.0);
    assert_eq!(config.player.default_rate, 1.0);
    assert!(!config.player.clamp_seek);
}

#[test]
fn config_serialize_toml() {
    let toml_str = Config::default().to_toml_string().unwrap();

    assert!(toml_str.contains("[general]"));
    assert!(toml_str.contains("[player]"));
    assert!(toml_str.contains("clamp_seek = false"));
}

#[test]
fn config_deserialize_toml() {
    let toml_str = r#"
        [general]
        log_level = "debug"

        [player]
        initial_volume = 0.25
        clamp_seek = true
    "#;

    let config = Config::from_toml_str(toml_str).unwrap();

    assert_eq!(config.general.log_level, LogLevel::Debug);
    assert_eq!(config.player.initial_volume, 0.25);
    assert!(config.player.clamp_seek);
    assert_eq!(config.player.default_rate, 1.0);
}

#[test]
fn config_empty_toml() {
    let config = Config::from_toml_str("").unwrap();

    assert_eq!(config, Config::default());
}

#[test]
fn config_rejects_unknown_log_level() {
    let result = Config::from_toml_str("[general]\nlog_level = \"loud\"");

    assert!(matches!(result, Err(UnderplayError::TomlParseError { .. })));
}

#[test]
fn config_rejects_zero_rate() {
    let result = Config::from_toml_str("[player]\ndefault_rate = 0.0");

    match result {
        Err(UnderplayError::ConfigValidation { field, .. }) => {
            assert_eq!(field, "player.default_rate");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn config_rejects_out_of_range_volume() {
    let result = Config::from_toml_str("[player]\ninitial_volume = 1.5");

    match result {
        Err(UnderplayError::ConfigValidation { field, .. }) => {
            assert_eq!(field, "player.initial_volume");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn log_level_display_matches_filter() {
    assert_eq!(LogLevel::Warn.to_string(), "warn");
    assert_eq!(LogLevel::Trace.as_filter(), "trace");
}
