//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# roster configuration
# Only override what you want to change -- missing fields use defaults.

[presence]
# resend_interval_ms = 15000   # 1000-300000, max gap between own heartbeats
# state_timeout_ms = 30000     # >= 2x resend_interval_ms, silent peers are evicted after this
# purge_interval_ms = 2000     # 100-60000, stale-peer sweep cadence
# debounce_ms = 250            # 10-5000, observer notification quiet period

[relay]
# port = 8080
# queue_capacity = 256         # 1-65536, per-connection outbound frames
# hello_timeout_secs = 10      # 1-120

[logging]
# level = "INFO"               # DEBUG, INFO, WARNING, ERROR
"##
}
