//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_roster_config.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, roster_common::ConfigError::FileNotFound(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[presence]
resend_interval_ms = 5000
state_timeout_ms = 10000

[relay]
port = 9000
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.presence.resend_interval_ms, 5000);
    assert_eq!(config.presence.state_timeout_ms, 10000);
    assert_eq!(config.relay.port, 9000);
    // Defaults preserved
    assert_eq!(config.presence.debounce_ms, 250);
    assert_eq!(config.presence.purge_interval_ms, 2000);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, roster_common::ConfigError::ParseError(_)));
}

#[test]
fn invalid_section_falls_back_without_discarding_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[presence]
state_timeout_ms = 16000

[relay]
port = 9000

[logging]
level = "DEBUG"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.presence, crate::schema::PresenceSettings::default());
    assert_eq!(config.relay.port, 9000);
    assert_eq!(config.logging.level, crate::schema::LogLevel::Debug);
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.presence, crate::schema::PresenceSettings::default());
    assert_eq!(config.relay.port, 8080);
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::RosterConfig;

    let config: RosterConfig = toml::from_str(default_config_toml()).unwrap();
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn default_config_path_is_reasonable() {
    // Not every CI environment has a config directory.
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("roster"));
        assert!(path_str.ends_with("config.toml"));
    }
}
