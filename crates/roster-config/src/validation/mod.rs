//! Full configuration validation.
//!
//! Validates numeric ranges and the cross-field timing rules of the
//! presence protocol. Each domain has its own submodule; this orchestrator
//! calls them all and collects errors into a single `ConfigError`.

mod helpers;
mod presence;
mod relay;

#[cfg(test)]
mod tests;

use crate::schema::RosterConfig;
use roster_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &RosterConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    presence::validate_presence(&mut errors, config);
    relay::validate_relay(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

/// Reset every invalid section to its defaults, keeping the valid ones.
///
/// Returns the problems found, one entry per bad value.
pub fn repair(config: &mut RosterConfig) -> Vec<String> {
    let mut problems = Vec::new();

    let mut errors = Vec::new();
    presence::validate_presence(&mut errors, config);
    if !errors.is_empty() {
        config.presence = Default::default();
        problems.append(&mut errors);
    }

    relay::validate_relay(&mut errors, config);
    if !errors.is_empty() {
        config.relay = Default::default();
        problems.append(&mut errors);
    }

    problems
}
