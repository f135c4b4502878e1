//! Timing configuration for the presence store.

use std::time::Duration;

use roster_common::ConfigError;
use roster_config::PresenceSettings;

/// Maximum gap between two broadcasts of our own state.
pub const RESEND_INTERVAL: Duration = Duration::from_secs(15);
/// Silence after which a peer is evicted: two missed heartbeats.
pub const STATE_TIMEOUT: Duration = Duration::from_secs(30);
/// Cadence of the stale-peer sweep.
pub const PURGE_INTERVAL: Duration = Duration::from_secs(2);
/// Quiet period before observers are notified.
pub const DEBOUNCE: Duration = Duration::from_millis(250);
/// Shortest timing the store runs with.
pub const MIN_TIMING: Duration = Duration::from_millis(1);

/// Timings used by one presence store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceConfig {
    pub resend_interval: Duration,
    pub state_timeout: Duration,
    pub purge_interval: Duration,
    pub debounce: Duration,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            resend_interval: RESEND_INTERVAL,
            state_timeout: STATE_TIMEOUT,
            purge_interval: PURGE_INTERVAL,
            debounce: DEBOUNCE,
        }
    }
}

impl PresenceConfig {
    /// Convert the millisecond settings of the config file.
    ///
    /// Zero timings are rejected.
    pub fn from_settings(settings: &PresenceSettings) -> Result<Self, ConfigError> {
        let config = Self {
            resend_interval: Duration::from_millis(settings.resend_interval_ms.into()),
            state_timeout: Duration::from_millis(settings.state_timeout_ms.into()),
            purge_interval: Duration::from_millis(settings.purge_interval_ms.into()),
            debounce: Duration::from_millis(settings.debounce_ms.into()),
        };

        let zero: Vec<String> = config
            .timings()
            .into_iter()
            .filter(|(_, value)| value.is_zero())
            .map(|(name, _)| format!("presence.{name}_ms must be greater than 0"))
            .collect();
        if zero.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::ValidationError(zero.join("; ")))
        }
    }

    /// Raise every timing below [`MIN_TIMING`] to it.
    pub(crate) fn clamped(mut self) -> Self {
        for timing in [
            &mut self.resend_interval,
            &mut self.state_timeout,
            &mut self.purge_interval,
            &mut self.debounce,
        ] {
            *timing = (*timing).max(MIN_TIMING);
        }
        self
    }

    fn timings(&self) -> [(&'static str, Duration); 4] {
        [
            ("resend_interval", self.resend_interval),
            ("state_timeout", self.state_timeout),
            ("purge_interval", self.purge_interval),
            ("debounce", self.debounce),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_timings() {
        let config = PresenceConfig::default();
        assert_eq!(config.resend_interval, Duration::from_secs(15));
        assert_eq!(config.state_timeout, 2 * config.resend_interval);
        assert_eq!(config.purge_interval, Duration::from_secs(2));
        assert_eq!(config.debounce, Duration::from_millis(250));
    }

    #[test]
    fn default_settings_convert_to_default_config() {
        let config = PresenceConfig::from_settings(&PresenceSettings::default()).unwrap();
        assert_eq!(config, PresenceConfig::default());
    }

    #[test]
    fn custom_settings_convert() {
        let settings = PresenceSettings {
            resend_interval_ms: 1_000,
            state_timeout_ms: 2_500,
            purge_interval_ms: 100,
            debounce_ms: 50,
        };
        let config = PresenceConfig::from_settings(&settings).unwrap();
        assert_eq!(config.resend_interval, Duration::from_secs(1));
        assert_eq!(config.state_timeout, Duration::from_millis(2_500));
        assert_eq!(config.purge_interval, Duration::from_millis(100));
        assert_eq!(config.debounce, Duration::from_millis(50));
    }

    #[test]
    fn zero_settings_are_rejected() {
        let settings = PresenceSettings {
            purge_interval_ms: 0,
            debounce_ms: 0,
            ..PresenceSettings::default()
        };
        let err = PresenceConfig::from_settings(&settings).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(msg.contains("presence.purge_interval_ms"));
        assert!(msg.contains("presence.debounce_ms"));
        assert!(!msg.contains("resend_interval"));
    }

    #[test]
    fn clamping_raises_only_zero_timings() {
        let config = PresenceConfig {
            resend_interval: Duration::ZERO,
            purge_interval: Duration::ZERO,
            ..PresenceConfig::default()
        }
        .clamped();
        assert_eq!(config.resend_interval, MIN_TIMING);
        assert_eq!(config.purge_interval, MIN_TIMING);
        assert_eq!(config.state_timeout, STATE_TIMEOUT);
        assert_eq!(config.debounce, DEBOUNCE);
    }
}
