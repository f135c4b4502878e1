//! Core TOML config loading: read from path or platform default.

use crate::schema::RosterConfig;
use crate::validation;
use roster_common::ConfigError;
use std::path::Path;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Deserializes the file using serde defaults for any missing fields.
/// After loading, the config is validated once. Each invalid value is
/// logged and its section falls back to defaults; valid sections are kept.
pub fn load_from_path(path: &Path) -> Result<RosterConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let mut config: RosterConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    let problems = validation::repair(&mut config);
    for problem in &problems {
        warn!("invalid config value: {problem}");
    }
    if !problems.is_empty() {
        warn!("sections with invalid values in {} use defaults", path.display());
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/roster/config.toml`
/// On Linux: `~/.config/roster/config.toml`
///
/// If the file does not exist, creates a default config file and returns defaults.
pub fn load_default() -> Result<RosterConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, creating default", path.display());
            create_default_config(&path)?;
            Ok(RosterConfig::default())
        }
        Err(e) => Err(e),
    }
}
