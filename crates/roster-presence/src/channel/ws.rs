//! WebSocket channel speaking to a `roster-relay` server.
//!
//! After a `join` handshake, outbound messages are queued to a writer task
//! and inbound envelopes are fanned out to every live listener by a reader
//! task. Transport errors are logged and swallowed: sends stay
//! fire-and-forget.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use roster_common::PresenceError;

use crate::protocol::{Envelope, PresenceMessage, RelayHello, RelayReply};

use super::Channel;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type Listeners = Arc<Mutex<Vec<mpsc::UnboundedSender<Envelope>>>>;

/// A channel backed by one WebSocket connection to the relay.
#[derive(Debug)]
pub struct WsChannel {
    identity: String,
    room: String,
    outbound: mpsc::UnboundedSender<String>,
    listeners: Listeners,
    reader: JoinHandle<()>,
}

impl WsChannel {
    /// Connect to `url`, join `room` as `identity`, and start the I/O tasks.
    pub async fn connect(url: &str, room: &str, identity: &str) -> Result<Self, PresenceError> {
        info!(url = %url, room = %room, "Connecting to presence relay");

        let (ws, _) = tokio::time::timeout(CONNECT_TIMEOUT, tokio_tungstenite::connect_async(url))
            .await
            .map_err(|_| PresenceError::Transport("connection timed out after 15s".into()))?
            .map_err(|e| PresenceError::Transport(format!("connection failed: {e}")))?;

        let (mut write, mut read) = ws.split();
        handshake(&mut write, &mut read, room, identity).await?;

        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let listeners: Listeners = Arc::default();

        tokio::spawn(writer_task(write, outbound_rx));
        let reader = tokio::spawn(reader_task(read, Arc::clone(&listeners)));

        info!(room = %room, identity = %identity, "Joined presence relay room");
        Ok(Self {
            identity: identity.to_string(),
            room: room.to_string(),
            outbound,
            listeners,
            reader,
        })
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    fn enqueue(&self, message: &PresenceMessage) {
        match serde_json::to_string(message) {
            Ok(json) => {
                if self.outbound.send(json).is_err() {
                    debug!(kind = message.kind(), "Relay writer gone, message dropped");
                }
            }
            Err(e) => warn!(error = %e, "Failed to encode presence message"),
        }
    }
}

impl Channel for WsChannel {
    fn send(&self, message: PresenceMessage) {
        self.enqueue(&message);
    }

    fn send_beacon(&self, message: PresenceMessage) {
        // The writer drains its queue before closing, so a beacon queued
        // ahead of teardown still goes out.
        self.enqueue(&message);
    }

    fn listen(&self) -> mpsc::UnboundedReceiver<Envelope> {
        let (tx, rx) = mpsc::unbounded_channel();
        lock(&self.listeners).push(tx);
        rx
    }
}

impl Drop for WsChannel {
    fn drop(&mut self) {
        // Dropping `outbound` lets the writer flush and close on its own.
        self.reader.abort();
        lock(&self.listeners).clear();
    }
}

fn lock(listeners: &Listeners) -> MutexGuard<'_, Vec<mpsc::UnboundedSender<Envelope>>> {
    listeners
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ---------------------------------------------------------------------------
// Handshake
// ---------------------------------------------------------------------------

async fn handshake(
    write: &mut SplitSink<WsStream, WsMessage>,
    read: &mut SplitStream<WsStream>,
    room: &str,
    identity: &str,
) -> Result<(), PresenceError> {
    let hello = RelayHello::Join {
        room: room.to_string(),
        identity: identity.to_string(),
    };
    let json = serde_json::to_string(&hello)
        .map_err(|e| PresenceError::Transport(format!("failed to encode hello: {e}")))?;
    write
        .send(WsMessage::Text(json.into()))
        .await
        .map_err(|e| PresenceError::Transport(format!("failed to send hello: {e}")))?;

    let reply = tokio::time::timeout(HANDSHAKE_TIMEOUT, read.next())
        .await
        .map_err(|_| PresenceError::Transport("relay did not answer the join".into()))?;

    match reply {
        Some(Ok(WsMessage::Text(text))) => match serde_json::from_str::<RelayReply>(&text) {
            Ok(RelayReply::Joined { .. }) => Ok(()),
            Ok(RelayReply::Error { message }) => Err(PresenceError::Transport(message)),
            Err(e) => Err(PresenceError::Transport(format!("unexpected relay reply: {e}"))),
        },
        Some(Ok(_)) => Err(PresenceError::Transport(
            "expected a text reply from the relay".into(),
        )),
        Some(Err(e)) => Err(PresenceError::Transport(format!("handshake failed: {e}"))),
        None => Err(PresenceError::Transport(
            "relay closed the connection during handshake".into(),
        )),
    }
}

// ---------------------------------------------------------------------------
// I/O tasks
// ---------------------------------------------------------------------------

async fn writer_task(
    mut write: SplitSink<WsStream, WsMessage>,
    mut outbound: mpsc::UnboundedReceiver<String>,
) {
    while let Some(json) = outbound.recv().await {
        if let Err(e) = write.send(WsMessage::Text(json.into())).await {
            warn!(error = %e, "Relay write failed");
            return;
        }
    }
    let _ = write.close().await;
    debug!("Relay writer finished");
}

async fn reader_task(mut read: SplitStream<WsStream>, listeners: Listeners) {
    while let Some(frame) = read.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => match serde_json::from_str::<Envelope>(&text) {
                Ok(envelope) => {
                    lock(&listeners).retain(|tx| tx.send(envelope.clone()).is_ok());
                }
                Err(e) => {
                    debug!(error = %e, "Skipping undecodable relay frame");
                }
            },
            Ok(WsMessage::Close(_)) => {
                info!("Presence relay closed the connection");
                break;
            }
            Err(e) => {
                warn!(error = %e, "Relay read failed");
                break;
            }
            _ => {}
        }
    }
    // Ending every listener tells the stores their channel is gone.
    lock(&listeners).clear();
}
