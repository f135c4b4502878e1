//! roster configuration system.
//!
//! Provides TOML-based configuration for the presence protocol timings,
//! the relay server, and logging. All config sections use the reference
//! defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use roster_config::{load_default, config_to_json};
//!
//! let config = load_default().expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

// Re-export core types for convenience
pub use schema::{LogLevel, LoggingConfig, PresenceSettings, RelayConfig, RosterConfig};
pub use toml_loader::{load_default, load_from_path};

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &RosterConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let config = RosterConfig::default();
        let json = config_to_json(&config);
        assert!(json.contains("\"presence\""));
        assert!(json.contains("\"relay\""));
        assert!(json.contains("\"logging\""));
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let config = RosterConfig::default();
        let json = config_to_json(&config);
        let parsed: RosterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.presence, PresenceSettings::default());
        assert_eq!(parsed.relay.port, 8080);
        assert_eq!(parsed.logging.level, LogLevel::Info);
    }
}
