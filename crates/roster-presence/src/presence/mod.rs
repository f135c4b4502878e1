//! Soft-state presence store.
//!
//! Tracks which remote sessions are present and what they are doing,
//! using only an unreliable broadcast `Channel`. Liveness comes from
//! periodic heartbeats, departures from `disconnect` beacons or from
//! timeout eviction. Observers get debounced, sorted snapshots.

mod multiplexer;
mod repository;
mod router;
mod store;
mod timer;
mod types;
pub mod views;


pub use multiplexer::{Multiplexer, PresenceStream};
pub use repository::StateRepository;
pub use router::{route, Routed};
pub use store::PresenceStore;
pub use timer::Deadline;
pub use types::{
    PresenceConfig, DEBOUNCE, MIN_TIMING, PURGE_INTERVAL, RESEND_INTERVAL, STATE_TIMEOUT,
};
