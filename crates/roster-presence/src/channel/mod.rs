//! The transport capability the presence store runs on.
//!
//! A channel is an unreliable broadcast medium: sends are fire-and-forget,
//! nothing is acknowledged, and inbound messages may be lost, duplicated or
//! reordered. The store stays correct anyway through heartbeats and
//! timeouts, so implementations must not add retries of their own.

mod local;
mod ws;

pub use local::{LocalChannel, LocalHub};
pub use ws::WsChannel;

use tokio::sync::mpsc;

use crate::protocol::{Envelope, PresenceMessage};

/// Best-effort broadcast transport.
pub trait Channel: Send + Sync + 'static {
    /// Broadcast a message to the other peers. Never blocks, never fails.
    fn send(&self, message: PresenceMessage);

    /// Broadcast during teardown. Must not rely on any reply path.
    fn send_beacon(&self, message: PresenceMessage);

    /// Subscribe to inbound messages. Dropping the receiver unsubscribes.
    fn listen(&self) -> mpsc::UnboundedReceiver<Envelope>;
}
