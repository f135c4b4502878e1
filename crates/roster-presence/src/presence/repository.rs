//! In-memory soft-state repository of remote peers.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::protocol::{PeerState, Snapshot};

#[derive(Debug, Clone)]
struct Entry {
    state: PeerState,
    last_seen: Instant,
}

/// Last known state of every remote session, keyed by composite key.
///
/// Keys are kept ordered so snapshots come out sorted without extra work.
#[derive(Debug, Default)]
pub struct StateRepository {
    entries: BTreeMap<String, Entry>,
}

impl StateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&PeerState> {
        self.entries.get(key).map(|entry| &entry.state)
    }

    pub fn last_seen(&self, key: &str) -> Option<Instant> {
        self.entries.get(key).map(|entry| entry.last_seen)
    }

    /// Record `state` as seen at `now`.
    ///
    /// The timestamp is always refreshed. Returns `true` only when the
    /// stored value changed (new key, or not deep-equal to the cached one).
    pub fn upsert(&mut self, state: PeerState, now: Instant) -> bool {
        let key = state.key();
        match self.entries.get_mut(&key) {
            Some(entry) => {
                entry.last_seen = now;
                if entry.state == state {
                    false
                } else {
                    entry.state = state;
                    true
                }
            }
            None => {
                self.entries.insert(
                    key,
                    Entry {
                        state,
                        last_seen: now,
                    },
                );
                true
            }
        }
    }

    /// Remove a key. Returns `true` if it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Evict every entry older than `timeout`, returning the evicted keys.
    pub fn purge_stale(&mut self, now: Instant, timeout: Duration) -> Vec<String> {
        let mut evicted = Vec::new();
        self.entries.retain(|key, entry| {
            let stale = now.saturating_duration_since(entry.last_seen) > timeout;
            if stale {
                evicted.push(key.clone());
            }
            !stale
        });
        evicted
    }

    /// Every cached state, sorted by composite key.
    pub fn snapshot(&self) -> Snapshot {
        self.entries
            .values()
            .map(|entry| entry.state.clone())
            .collect()
    }
}
