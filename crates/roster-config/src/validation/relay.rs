use crate::schema::RosterConfig;

use super::helpers::validate_range;

/// Validate relay constraints.
pub(crate) fn validate_relay(errors: &mut Vec<String>, config: &RosterConfig) {
    if config.relay.port == 0 {
        errors.push("relay.port must not be 0".to_string());
    }
    validate_range(
        errors,
        "relay.queue_capacity",
        config.relay.queue_capacity,
        1,
        65_536,
    );
    validate_range(
        errors,
        "relay.hello_timeout_secs",
        config.relay.hello_timeout_secs,
        1,
        120,
    );
}
