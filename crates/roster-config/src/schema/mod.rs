//! Configuration schema types for roster.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the protocol's reference timings.

mod presence;
mod relay;
mod system;

pub use presence::*;
pub use relay::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Root configuration for roster.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub presence: PresenceSettings,
    pub relay: RelayConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_reference_timings() {
        let config = RosterConfig::default();
        assert_eq!(config.presence.resend_interval_ms, 15_000);
        assert_eq!(config.presence.state_timeout_ms, 30_000);
        assert_eq!(config.presence.purge_interval_ms, 2_000);
        assert_eq!(config.presence.debounce_ms, 250);
    }

    #[test]
    fn default_state_timeout_is_two_heartbeats() {
        let presence = PresenceSettings::default();
        assert_eq!(presence.state_timeout_ms, 2 * presence.resend_interval_ms);
    }

    #[test]
    fn default_config_has_correct_relay() {
        let config = RosterConfig::default();
        assert_eq!(config.relay.port, 8080);
        assert_eq!(config.relay.queue_capacity, 256);
        assert_eq!(config.relay.hello_timeout_secs, 10);
    }

    #[test]
    fn default_config_has_correct_logging() {
        let config = RosterConfig::default();
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn log_level_directives() {
        assert_eq!(LogLevel::Debug.as_directive(), "debug");
        assert_eq!(LogLevel::Info.as_directive(), "info");
        assert_eq!(LogLevel::Warning.as_directive(), "warn");
        assert_eq!(LogLevel::Error.as_directive(), "error");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: RosterConfig = toml::from_str(
            r#"
[presence]
debounce_ms = 100
"#,
        )
        .unwrap();
        assert_eq!(config.presence.debounce_ms, 100);
        assert_eq!(config.presence.resend_interval_ms, 15_000);
        assert_eq!(config.relay.port, 8080);
    }

    #[test]
    fn log_level_parses_uppercase() {
        let config: RosterConfig = toml::from_str(
            r#"
[logging]
level = "DEBUG"
"#,
        )
        .unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
    }
}
