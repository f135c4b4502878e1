//! In-process broadcast hub.
//!
//! Every connection shares one medium. A message sent on one connection is
//! stamped with that connection's identity and handed to every listener of
//! every other connection, and to its own listeners too when loopback is on.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use tracing::debug;

use crate::protocol::{Envelope, PresenceMessage};

use super::Channel;

struct Listener {
    connection: u64,
    tx: mpsc::UnboundedSender<Envelope>,
}

#[derive(Default)]
struct HubInner {
    next_connection: u64,
    listeners: Vec<Listener>,
}

/// Shared broadcast medium for peers living in one process.
#[derive(Clone, Default)]
pub struct LocalHub {
    inner: Arc<Mutex<HubInner>>,
    loopback: bool,
}

impl LocalHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// A hub that also echoes every message back to its sender.
    pub fn with_loopback() -> Self {
        Self {
            inner: Arc::default(),
            loopback: true,
        }
    }

    /// Open a connection that sends as `identity`.
    pub fn connect(&self, identity: impl Into<String>) -> LocalChannel {
        let connection = {
            let mut inner = self.lock();
            inner.next_connection += 1;
            inner.next_connection
        };
        LocalChannel {
            hub: self.clone(),
            connection,
            identity: identity.into(),
        }
    }

    /// Number of live listeners across all connections.
    pub fn listener_count(&self) -> usize {
        let mut inner = self.lock();
        inner.listeners.retain(|listener| !listener.tx.is_closed());
        inner.listeners.len()
    }

    fn lock(&self) -> MutexGuard<'_, HubInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn register(&self, connection: u64) -> mpsc::UnboundedReceiver<Envelope> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().listeners.push(Listener { connection, tx });
        rx
    }

    fn deliver(&self, from: u64, envelope: Envelope) {
        let mut inner = self.lock();
        let loopback = self.loopback;
        inner.listeners.retain(|listener| {
            if listener.connection == from && !loopback {
                return !listener.tx.is_closed();
            }
            listener.tx.send(envelope.clone()).is_ok()
        });
        debug!(
            sender = %envelope.sender,
            kind = envelope.message.kind(),
            listeners = inner.listeners.len(),
            "Hub delivered message"
        );
    }
}

/// One peer's connection to a [`LocalHub`].
pub struct LocalChannel {
    hub: LocalHub,
    connection: u64,
    identity: String,
}

impl LocalChannel {
    pub fn identity(&self) -> &str {
        &self.identity
    }
}

impl Channel for LocalChannel {
    fn send(&self, message: PresenceMessage) {
        self.hub
            .deliver(self.connection, Envelope::new(self.identity.clone(), message));
    }

    fn send_beacon(&self, message: PresenceMessage) {
        self.send(message);
    }

    fn listen(&self) -> mpsc::UnboundedReceiver<Envelope> {
        self.hub.register(self.connection)
    }
}
