use super::*;

#[test]
fn default_config_is_valid() {
    assert!(validate(&RosterConfig::default()).is_ok());
}

#[test]
fn resend_interval_out_of_range() {
    let mut config = RosterConfig::default();
    config.presence.resend_interval_ms = 500;
    config.presence.state_timeout_ms = 1_000;
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("presence.resend_interval_ms"));
}

#[test]
fn state_timeout_must_cover_two_heartbeats() {
    let mut config = RosterConfig::default();
    config.presence.state_timeout_ms = 29_999;
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("at least twice"));
}

#[test]
fn state_timeout_exactly_twice_is_valid() {
    let mut config = RosterConfig::default();
    config.presence.resend_interval_ms = 5_000;
    config.presence.state_timeout_ms = 10_000;
    assert!(validate(&config).is_ok());
}

#[test]
fn purge_interval_must_be_shorter_than_timeout() {
    let mut config = RosterConfig::default();
    config.presence.resend_interval_ms = 1_000;
    config.presence.state_timeout_ms = 2_000;
    config.presence.purge_interval_ms = 2_000;
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("presence.purge_interval_ms"));
}

#[test]
fn debounce_out_of_range() {
    let mut config = RosterConfig::default();
    config.presence.debounce_ms = 0;
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("presence.debounce_ms = 0"));
}

#[test]
fn relay_port_zero_is_invalid() {
    let mut config = RosterConfig::default();
    config.relay.port = 0;
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("relay.port"));
}

#[test]
fn multiple_errors_are_collected() {
    let mut config = RosterConfig::default();
    config.presence.debounce_ms = 0;
    config.relay.queue_capacity = 0;
    config.relay.hello_timeout_secs = 500;
    let msg = validate(&config).unwrap_err().to_string();
    assert!(msg.contains("presence.debounce_ms"));
    assert!(msg.contains("relay.queue_capacity"));
    assert!(msg.contains("relay.hello_timeout_secs"));
    assert_eq!(msg.matches("; ").count(), 2);
}

#[test]
fn repair_keeps_valid_config_untouched() {
    let mut config = RosterConfig::default();
    config.relay.port = 9000;
    assert!(repair(&mut config).is_empty());
    assert_eq!(config.relay.port, 9000);
}

#[test]
fn repair_resets_only_the_invalid_section() {
    let mut config = RosterConfig::default();
    config.presence.debounce_ms = 0;
    config.presence.resend_interval_ms = 5_000;
    config.relay.port = 9000;
    config.logging.level = crate::schema::LogLevel::Debug;

    let problems = repair(&mut config);
    assert_eq!(problems.len(), 1);
    assert!(problems[0].contains("presence.debounce_ms"));
    assert_eq!(config.presence, crate::schema::PresenceSettings::default());
    assert_eq!(config.relay.port, 9000);
    assert_eq!(config.logging.level, crate::schema::LogLevel::Debug);
    assert!(validate(&config).is_ok());
}

#[test]
fn repair_reports_every_bad_field() {
    let mut config = RosterConfig::default();
    config.presence.purge_interval_ms = 0;
    config.relay.queue_capacity = 0;
    config.relay.hello_timeout_secs = 0;

    let problems = repair(&mut config);
    assert_eq!(problems.len(), 3);
    assert!(problems.iter().any(|p| p.contains("relay.hello_timeout_secs")));
    assert_eq!(config.relay.queue_capacity, 256);
}
