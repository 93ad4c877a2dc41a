// Config file loading tests

use characterworks::config::{load_config, load_settings, TargetOverrides};
use characterworks::{DeviceConfig, Validation};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_full_config_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[device]
host = "10.1.2.3"
port = 7000

[client]
validate_responses = true
timeout_seconds = 4
"#,
    );

    let settings = load_settings(&path).unwrap();
    assert_eq!(settings.device.host.as_deref(), Some("10.1.2.3"));
    assert_eq!(settings.device.port, Some(7000));
    assert!(settings.client.validate_responses);
    assert_eq!(settings.client.timeout_seconds, Some(4));
}

#[test]
fn test_partial_file_completed_by_flags() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[device]\nhost = \"studio-cw\"\n");

    let overrides = TargetOverrides {
        port: Some(7300),
        ..Default::default()
    };
    let resolved = load_config(&overrides, Some(&path)).unwrap();

    // Environment variables may be set on the machine running the tests;
    // only assert what flags pin down.
    assert_eq!(resolved.target.port, 7300);
    if std::env::var("CHARACTERWORKS_HOST").is_err() {
        assert_eq!(resolved.target, DeviceConfig::new("studio-cw", 7300));
    }
    assert_eq!(resolved.validation, Validation::Trust);
    assert_eq!(resolved.timeout, Duration::from_secs(10));
}

#[test]
fn test_malformed_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[device]\nport = \"seven thousand\"\n");

    let err = load_settings(&path).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Failed to parse config file"));
    assert!(message.contains("config.toml"));
}
