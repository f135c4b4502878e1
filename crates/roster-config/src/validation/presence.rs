//! Presence timing validation.

use crate::schema::RosterConfig;

use super::helpers::validate_range;

/// Validate presence timings.
///
/// A peer must be able to miss one heartbeat without being evicted, so the
/// state timeout has to cover at least two resend intervals. The sweep has
/// to run more often than the timeout or eviction lags by whole periods.
pub(crate) fn validate_presence(errors: &mut Vec<String>, config: &RosterConfig) {
    let p = &config.presence;

    validate_range(
        errors,
        "presence.resend_interval_ms",
        p.resend_interval_ms,
        1_000,
        300_000,
    );
    validate_range(
        errors,
        "presence.purge_interval_ms",
        p.purge_interval_ms,
        100,
        60_000,
    );
    validate_range(errors, "presence.debounce_ms", p.debounce_ms, 10, 5_000);

    if u64::from(p.state_timeout_ms) < 2 * u64::from(p.resend_interval_ms) {
        errors.push(format!(
            "presence.state_timeout_ms = {} must be at least twice presence.resend_interval_ms ({})",
            p.state_timeout_ms, p.resend_interval_ms
        ));
    }

    if p.purge_interval_ms >= p.state_timeout_ms {
        errors.push(format!(
            "presence.purge_interval_ms = {} must be shorter than presence.state_timeout_ms ({})",
            p.purge_interval_ms, p.state_timeout_ms
        ));
    }
}
