//! Room registry: maps room names to the connections that joined them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};

/// Connection id handed out by [`RoomRegistry::join`].
pub type ConnectionId = u64;

struct Member {
    identity: String,
    tx: mpsc::Sender<String>,
}

#[derive(Default)]
struct Room {
    members: HashMap<ConnectionId, Member>,
}

/// Thread-safe room registry.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<RwLock<HashMap<String, Room>>>,
    next_id: Arc<AtomicU64>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to `room`, creating the room if needed.
    pub async fn join(&self, room: &str, identity: &str, tx: mpsc::Sender<String>) -> ConnectionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let mut rooms = self.rooms.write().await;
        rooms.entry(room.to_string()).or_default().members.insert(
            id,
            Member {
                identity: identity.to_string(),
                tx,
            },
        );
        id
    }

    /// Remove a connection. Empty rooms are dropped. Returns true if the
    /// connection was present.
    pub async fn leave(&self, room: &str, id: ConnectionId) -> bool {
        let mut rooms = self.rooms.write().await;
        let Some(entry) = rooms.get_mut(room) else {
            return false;
        };
        let removed = entry.members.remove(&id).is_some();
        if entry.members.is_empty() {
            rooms.remove(room);
            tracing::debug!(room = %room, "Room emptied");
        }
        removed
    }

    /// Queue `frame` for every member of `room` except `from`.
    ///
    /// Members whose queue is full miss the frame; the protocol's
    /// heartbeats make up for it. Returns how many members got it.
    pub async fn broadcast(&self, room: &str, from: ConnectionId, frame: &str) -> usize {
        let rooms = self.rooms.read().await;
        let Some(entry) = rooms.get(room) else {
            return 0;
        };
        let mut delivered = 0;
        for (id, member) in &entry.members {
            if *id == from {
                continue;
            }
            match member.tx.try_send(frame.to_string()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(
                        room = %room,
                        identity = %member.identity,
                        "Member queue full, frame dropped"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {}
            }
        }
        delivered
    }

    /// Number of rooms with at least one member.
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Number of connections in `room`.
    pub async fn member_count(&self, room: &str) -> usize {
        self.rooms
            .read()
            .await
            .get(room)
            .map_or(0, |entry| entry.members.len())
    }
}
