//! Classifies inbound envelopes and applies them to the repository.

use tokio::time::Instant;
use tracing::debug;

use roster_common::SessionId;

use crate::protocol::{composite_key, Envelope, PeerState, PresenceMessage};

use super::repository::StateRepository;

/// What an inbound envelope did to the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// Nothing happened: self echo, unknown type, or nothing to remove.
    Ignored,
    /// A known peer re-sent its unchanged state; only its clock moved.
    Refreshed,
    /// The visible peer set changed; observers need a new snapshot.
    Changed,
    /// A peer asked everyone to re-announce their state.
    RollCall,
}

/// Apply one envelope to `repository`.
///
/// Never fails: anything unrecognized is a no-op.
pub fn route(
    repository: &mut StateRepository,
    local_session: &SessionId,
    envelope: Envelope,
    now: Instant,
) -> Routed {
    let Envelope { sender, message } = envelope;

    if message.session() == Some(local_session.as_str()) {
        return Routed::Ignored;
    }

    match message {
        PresenceMessage::State { session, payload } => {
            let state = PeerState::new(sender, session, payload);
            if repository.upsert(state, now) {
                Routed::Changed
            } else {
                Routed::Refreshed
            }
        }
        PresenceMessage::RollCall { session } => {
            debug!(peer = %sender, session = %session, "Roll call received");
            Routed::RollCall
        }
        PresenceMessage::Disconnect { session } => {
            if repository.remove(&composite_key(&sender, &session)) {
                debug!(peer = %sender, session = %session, "Peer disconnected");
                Routed::Changed
            } else {
                Routed::Ignored
            }
        }
        PresenceMessage::Unknown => {
            debug!(peer = %sender, "Ignoring presence message of unknown type");
            Routed::Ignored
        }
    }
}
