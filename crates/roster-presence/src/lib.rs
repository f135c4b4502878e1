//! Soft-state presence for peers on an unreliable broadcast channel.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use roster_presence::{LocalHub, PresenceConfig, PresenceStore};
//!
//! # async fn demo() {
//! let hub = LocalHub::new();
//! let store = PresenceStore::open(Arc::new(hub.connect("alice")), PresenceConfig::default());
//! store.report(&serde_json::json!({"locations": [{"documentId": "doc-1"}]})).unwrap();
//!
//! let mut presence = store.presence();
//! while let Some(snapshot) = presence.next_snapshot().await {
//!     println!("{} sessions present", snapshot.len());
//! }
//! # }
//! ```

pub mod channel;
pub mod presence;
pub mod protocol;

pub use channel::{Channel, LocalChannel, LocalHub, WsChannel};
pub use presence::views::{self, IdentityPresence};
pub use presence::{PresenceConfig, PresenceStore, PresenceStream};
pub use protocol::{
    composite_key, Envelope, Payload, PeerState, PresenceMessage, RelayHello, RelayReply,
    Snapshot,
};
