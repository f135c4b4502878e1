use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Errors surfaced by the presence store's public surface.
///
/// The protocol itself never fails: unknown messages, self echoes and lost
/// sends are all absorbed. These only cover misuse of the handle and
/// transport setup.
#[derive(Debug, thiserror::Error)]
pub enum PresenceError {
    #[error("presence store is closed")]
    Closed,

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Presence(#[from] PresenceError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
