//! roster-relay: WebSocket relay for presence rooms.
//!
//! Clients join a named room with an identity. Every frame a client sends
//! afterwards is stamped with that identity and forwarded to the other
//! members of the room. The relay keeps no presence state of its own.

mod connection;
mod protocol;
mod room;


use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;

use roster_common::{ConfigError, RosterError};
use roster_config::{RelayConfig, RosterConfig};

use crate::connection::handle_connection;
use crate::room::RoomRegistry;

#[derive(Parser)]
#[command(name = "roster-relay", about = "WebSocket relay for roster presence rooms")]
struct Args {
    /// Port to listen on (overrides the config file).
    #[arg(short, long)]
    port: Option<u16>,

    /// Config file to use instead of the default location.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    // Loading validates once and already resets sections with bad values;
    // only an unreadable file lands here.
    let (config, config_error) = match load(&args) {
        Ok(config) => (config, None),
        Err(e) => (RosterConfig::default(), Some(e)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_directive().into()),
        )
        .init();

    if let Some(e) = config_error {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
    }
    tracing::debug!(config = %roster_config::config_to_json(&config), "Effective config");

    if let Err(e) = run(config, args.port).await {
        tracing::error!(error = %e, "roster-relay stopped");
        std::process::exit(1);
    }
}

fn load(args: &Args) -> Result<RosterConfig, ConfigError> {
    match &args.config {
        Some(path) => roster_config::load_from_path(path),
        None => roster_config::load_default(),
    }
}

async fn run(config: RosterConfig, port: Option<u16>) -> Result<(), RosterError> {
    let relay = config.relay;
    let addr = format!("0.0.0.0:{}", port.unwrap_or(relay.port));
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(
        addr = %addr,
        queue_capacity = relay.queue_capacity,
        "roster-relay listening"
    );

    serve(listener, RoomRegistry::new(), relay).await;
    Ok(())
}

/// Accept loop.
async fn serve(listener: TcpListener, rooms: RoomRegistry, relay: RelayConfig) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let rooms = rooms.clone();
                let relay = relay.clone();
                tokio::spawn(async move {
                    match accept_async(stream).await {
                        Ok(ws) => handle_connection(ws, addr, rooms, relay).await,
                        Err(e) => {
                            tracing::warn!(peer = %addr, error = %e, "WS handshake failed");
                        }
                    }
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "TCP accept error");
            }
        }
    }
}
