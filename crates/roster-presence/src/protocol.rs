//! Wire types for the presence protocol.
//!
//! Peers exchange `PresenceMessage`s over a `Channel`. The channel stamps
//! each inbound message with the sender's identity, producing an
//! `Envelope`. Only `state` messages carry a payload; `rollCall` and
//! `disconnect` carry nothing but the session id.
//!
//! The relay hello/reply types ride on the same WebSocket as the envelopes
//! and live here so the client and the relay share one definition.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Arbitrary "what I am doing now" fields of a peer.
pub type Payload = serde_json::Map<String, Value>;

/// All known peer states, sorted by composite key.
pub type Snapshot = Vec<PeerState>;

/// Keys owned by the envelope. They never survive inside a payload.
pub const RESERVED_KEYS: [&str; 3] = ["type", "identity", "session"];

/// Message type names as they appear in the `type` field.
pub mod kinds {
    pub const STATE: &str = "state";
    pub const ROLL_CALL: &str = "rollCall";
    pub const DISCONNECT: &str = "disconnect";
}

/// Composite repository key for one session of one identity.
pub fn composite_key(identity: &str, session: &str) -> String {
    format!("{identity}__{session}")
}

/// Remove envelope-owned keys from a payload.
pub fn strip_reserved(mut payload: Payload) -> Payload {
    for key in RESERVED_KEYS {
        payload.remove(key);
    }
    payload
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// A presence protocol message, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PresenceMessage {
    /// The sender's current state. Doubles as the heartbeat.
    State {
        session: String,
        #[serde(flatten)]
        payload: Payload,
    },
    /// Asks every peer to re-announce its state right away.
    RollCall { session: String },
    /// Graceful leave of one session.
    Disconnect { session: String },
    /// Any message type this build does not know about.
    #[serde(other)]
    Unknown,
}

impl PresenceMessage {
    /// Build a `state` message, dropping reserved keys from the payload.
    pub fn state(session: impl Into<String>, payload: Payload) -> Self {
        Self::State {
            session: session.into(),
            payload: strip_reserved(payload),
        }
    }

    pub fn roll_call(session: impl Into<String>) -> Self {
        Self::RollCall {
            session: session.into(),
        }
    }

    pub fn disconnect(session: impl Into<String>) -> Self {
        Self::Disconnect {
            session: session.into(),
        }
    }

    /// Session id carried by the message, if the type is known.
    pub fn session(&self) -> Option<&str> {
        match self {
            Self::State { session, .. }
            | Self::RollCall { session }
            | Self::Disconnect { session } => Some(session),
            Self::Unknown => None,
        }
    }

    /// The wire `type` name, or `"unknown"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::State { .. } => kinds::STATE,
            Self::RollCall { .. } => kinds::ROLL_CALL,
            Self::Disconnect { .. } => kinds::DISCONNECT,
            Self::Unknown => "unknown",
        }
    }
}

/// An inbound message together with the identity that sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub sender: String,
    pub message: PresenceMessage,
}

impl Envelope {
    pub fn new(sender: impl Into<String>, message: PresenceMessage) -> Self {
        Self {
            sender: sender.into(),
            message,
        }
    }
}

// ---------------------------------------------------------------------------
// Peer state
// ---------------------------------------------------------------------------

/// Last known state of one remote session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerState {
    pub identity: String,
    pub session: String,
    #[serde(flatten)]
    pub payload: Payload,
}

impl PeerState {
    pub fn new(identity: impl Into<String>, session: impl Into<String>, payload: Payload) -> Self {
        Self {
            identity: identity.into(),
            session: session.into(),
            payload: strip_reserved(payload),
        }
    }

    pub fn key(&self) -> String {
        composite_key(&self.identity, &self.session)
    }

    /// Look up one payload field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.payload.get(field)
    }
}

// ---------------------------------------------------------------------------
// Relay handshake
// ---------------------------------------------------------------------------

/// First frame a client sends to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayHello {
    Join { room: String, identity: String },
}

/// Frames the relay sends back during the handshake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayReply {
    Joined { room: String },
    Error { message: String },
}
