//! Presence protocol timing configuration.

use serde::{Deserialize, Serialize};

/// Presence protocol timings, all in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceSettings {
    /// Maximum gap between two broadcasts of our own state (valid range: 1000-300000).
    pub resend_interval_ms: u32,
    /// Age after which a silent peer is evicted. Must be at least twice the
    /// resend interval so one dropped heartbeat never evicts.
    pub state_timeout_ms: u32,
    /// Cadence of the stale-peer sweep (valid range: 100-60000).
    pub purge_interval_ms: u32,
    /// Quiet period before observers are notified (valid range: 10-5000).
    pub debounce_ms: u32,
}

impl Default for PresenceSettings {
    fn default() -> Self {
        Self {
            resend_interval_ms: 15_000,
            state_timeout_ms: 30_000,
            purge_interval_ms: 2_000,
            debounce_ms: 250,
        }
    }
}
