//! # Configuration Tests
//!
//! Defaults, partial JSON, file loading and validation.

use std::io::Write;

use tandem_core::Simulator;
use tandem_core::common::ConfigError;
use tandem_core::config::*;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert!(!config.general.trace_instructions);
    assert_eq!(config.general.max_steps, 100_000);
    assert!(config.compute.enabled);
    assert_eq!(config.compute.lanes, 8);
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_json_yields_defaults() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let config = Config::from_json(r#"{ "general": { "max_steps": 50 } }"#).unwrap();
    assert_eq!(config.general.max_steps, 50);
    assert!(!config.general.trace_instructions);
    assert_eq!(config.compute, ComputeConfig::default());
}

#[test]
fn test_zero_lanes_rejected() {
    let err = Config::from_json(r#"{ "compute": { "lanes": 0 } }"#).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid {
            field: "compute.lanes",
            ..
        }
    ));
}

#[test]
fn test_zero_max_steps_rejected() {
    let err = Config::from_json(r#"{ "general": { "max_steps": 0 } }"#).unwrap_err();
    assert!(err.to_string().contains("general.max_steps"));
}

#[test]
fn test_malformed_json_rejected() {
    assert!(matches!(
        Config::from_json("{ not json"),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        Config::from_json(r#"{ "compute": { "lanes": "eight" } }"#),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "general": {{ "trace_instructions": true }}, "compute": {{ "lanes": 3 }} }}"#
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert!(config.general.trace_instructions);
    assert_eq!(config.compute.lanes, 3);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_config_shapes_the_simulator() {
    let config = Config::from_json(r#"{ "compute": { "lanes": 3 } }"#).unwrap();
    let sim = Simulator::new(&config);
    assert_eq!(sim.cpu.compute().map(|gpu| gpu.lane_count()), Some(3));
    assert_eq!(sim.config(), &config);

    let config = Config::from_json(r#"{ "compute": { "enabled": false } }"#).unwrap();
    let sim = Simulator::new(&config);
    assert!(sim.cpu.compute().is_none());
}

#[test]
fn test_config_serializes_every_field() {
    let json = serde_json::to_value(Config::default()).unwrap();
    assert_eq!(json["general"]["max_steps"], 100_000);
    assert_eq!(json["compute"]["lanes"], 8);
    assert_eq!(json["compute"]["enabled"], true);
}
