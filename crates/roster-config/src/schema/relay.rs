use serde::{Deserialize, Serialize};

/// Configuration for the presence relay server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// TCP port the relay listens on.
    pub port: u16,
    /// Outbound queue depth per connection; frames beyond it are dropped.
    pub queue_capacity: u32,
    /// Seconds a new connection has to send its join hello.
    pub hello_timeout_secs: u32,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            queue_capacity: 256,
            hello_timeout_secs: 10,
        }
    }
}
