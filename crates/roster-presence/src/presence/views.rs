//! Derived views over a presence snapshot.
//!
//! A snapshot lists sessions. Most consumers want something coarser:
//! who is looking at one document, or one entry per user with all of
//! their open sessions.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::protocol::{PeerState, Snapshot};

/// Payload field holding the list of places a session is looking at.
pub const LOCATIONS_FIELD: &str = "locations";
/// Field of a location naming the document.
pub const DOCUMENT_ID_FIELD: &str = "documentId";

/// All sessions of one identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentityPresence {
    pub identity: String,
    pub sessions: Vec<PeerState>,
}

/// Group sessions by identity, identities in ascending order.
///
/// Sessions keep their snapshot order within a group.
pub fn by_identity(snapshot: &[PeerState]) -> Vec<IdentityPresence> {
    let mut groups: BTreeMap<&str, Vec<PeerState>> = BTreeMap::new();
    for state in snapshot {
        groups
            .entry(state.identity.as_str())
            .or_default()
            .push(state.clone());
    }
    groups
        .into_iter()
        .map(|(identity, sessions)| IdentityPresence {
            identity: identity.to_string(),
            sessions,
        })
        .collect()
}

/// Sessions whose `locations` include `document_id`.
pub fn at_location(snapshot: &[PeerState], document_id: &str) -> Snapshot {
    snapshot
        .iter()
        .filter(|state| is_at(state, document_id))
        .cloned()
        .collect()
}

/// Every session except those of `identity`.
pub fn excluding_identity(snapshot: &[PeerState], identity: &str) -> Snapshot {
    snapshot
        .iter()
        .filter(|state| state.identity != identity)
        .cloned()
        .collect()
}

fn is_at(state: &PeerState, document_id: &str) -> bool {
    state
        .get(LOCATIONS_FIELD)
        .and_then(|locations| locations.as_array())
        .is_some_and(|locations| {
            locations.iter().any(|location| {
                location.get(DOCUMENT_ID_FIELD).and_then(|id| id.as_str()) == Some(document_id)
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn peer(identity: &str, session: &str, fields: Value) -> PeerState {
        let Value::Object(payload) = fields else {
            panic!("payload must be an object");
        };
        PeerState::new(identity, session, payload)
    }

    fn snapshot() -> Snapshot {
        vec![
            peer(
                "alice",
                "s1",
                json!({"locations": [{"documentId": "doc-1", "path": ["title"]}]}),
            ),
            peer("alice", "s2", json!({"locations": []})),
            peer(
                "bob",
                "s1",
                json!({"locations": [{"documentId": "doc-2"}, {"documentId": "doc-1"}]}),
            ),
            peer("carol", "s9", json!({"im": "idle"})),
        ]
    }

    #[test]
    fn groups_sessions_per_identity() {
        let groups = by_identity(&snapshot());
        let names: Vec<&str> = groups.iter().map(|g| g.identity.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
        assert_eq!(groups[0].sessions.len(), 2);
        assert_eq!(groups[0].sessions[0].session, "s1");
        assert_eq!(groups[0].sessions[1].session, "s2");
        assert_eq!(groups[1].sessions.len(), 1);
    }

    #[test]
    fn grouping_orders_by_identity_not_composite_key() {
        // "a-b__s1" sorts before "a__s1" as a composite key.
        let snap = vec![peer("a-b", "s1", json!({})), peer("a", "s1", json!({}))];
        let groups = by_identity(&snap);
        assert_eq!(groups[0].identity, "a");
        assert_eq!(groups[1].identity, "a-b");
    }

    #[test]
    fn filters_by_document_location() {
        let at_doc1 = at_location(&snapshot(), "doc-1");
        let keys: Vec<String> = at_doc1.iter().map(PeerState::key).collect();
        assert_eq!(keys, vec!["alice__s1", "bob__s1"]);

        assert!(at_location(&snapshot(), "doc-404").is_empty());
    }

    #[test]
    fn malformed_locations_are_skipped() {
        let snap = vec![
            peer("x", "s1", json!({"locations": "doc-1"})),
            peer("y", "s1", json!({"locations": [{"documentId": 1}]})),
        ];
        assert!(at_location(&snap, "doc-1").is_empty());
    }

    #[test]
    fn excludes_one_identity() {
        let others = excluding_identity(&snapshot(), "alice");
        assert_eq!(others.len(), 2);
        assert!(others.iter().all(|state| state.identity != "alice"));
    }

    #[test]
    fn empty_snapshot_yields_empty_views() {
        assert!(by_identity(&[]).is_empty());
        assert!(at_location(&[], "doc-1").is_empty());
        assert!(excluding_identity(&[], "alice").is_empty());
    }
}
