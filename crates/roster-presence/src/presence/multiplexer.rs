//! Fan-out of presence snapshots to local observers.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::mpsc;

use crate::protocol::Snapshot;

pub(crate) type SnapshotSink = mpsc::UnboundedSender<Snapshot>;

/// Registry of observer sinks owned by one presence store.
#[derive(Debug, Default)]
pub struct Multiplexer {
    sinks: Vec<SnapshotSink>,
}

impl Multiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered sinks, including ones whose receiver is gone
    /// but that have not been pruned by a push yet.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Register a sink and replay `current` to it right away.
    pub(crate) fn attach(&mut self, sink: SnapshotSink, current: Snapshot) {
        if sink.send(current).is_ok() {
            self.sinks.push(sink);
        }
    }

    /// Create a stream and register its sink.
    pub fn subscribe(&mut self, current: Snapshot) -> PresenceStream {
        let (sink, stream) = PresenceStream::channel();
        self.attach(sink, current);
        stream
    }

    /// Send `snapshot` to every live sink, dropping closed ones.
    ///
    /// Returns the number of sinks that received it.
    pub fn push(&mut self, snapshot: &Snapshot) -> usize {
        self.sinks.retain(|sink| sink.send(snapshot.clone()).is_ok());
        self.sinks.len()
    }

    /// Drop every sink, ending all streams.
    pub fn close(&mut self) {
        self.sinks.clear();
    }
}

// ---------------------------------------------------------------------------
// Stream
// ---------------------------------------------------------------------------

/// Observer side of the multiplexer.
///
/// The first item is the snapshot current at subscription time; later
/// items are debounced updates. Ends when the store closes.
#[derive(Debug)]
pub struct PresenceStream {
    rx: mpsc::UnboundedReceiver<Snapshot>,
}

impl PresenceStream {
    pub(crate) fn channel() -> (SnapshotSink, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }

    /// Wait for the next snapshot. `None` once the store has closed.
    pub async fn next_snapshot(&mut self) -> Option<Snapshot> {
        self.rx.recv().await
    }

    /// Take an already delivered snapshot without waiting.
    pub fn try_next_snapshot(&mut self) -> Option<Snapshot> {
        self.rx.try_recv().ok()
    }
}

impl Stream for PresenceStream {
    type Item = Snapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PeerState;
    use futures_util::StreamExt;

    fn peer(identity: &str) -> PeerState {
        PeerState::new(identity, "s1", serde_json::Map::new())
    }

    #[tokio::test]
    async fn subscribe_replays_current_snapshot() {
        let mut mux = Multiplexer::new();
        let mut stream = mux.subscribe(vec![peer("id1")]);
        assert_eq!(stream.next_snapshot().await, Some(vec![peer("id1")]));
    }

    #[tokio::test]
    async fn cold_subscribe_gets_empty_snapshot() {
        let mut mux = Multiplexer::new();
        let mut stream = mux.subscribe(Vec::new());
        assert_eq!(stream.next().await, Some(Vec::new()));
    }

    #[tokio::test]
    async fn push_reaches_every_sink() {
        let mut mux = Multiplexer::new();
        let mut a = mux.subscribe(Vec::new());
        let mut b = mux.subscribe(Vec::new());
        a.next_snapshot().await;
        b.next_snapshot().await;

        assert_eq!(mux.push(&vec![peer("id1")]), 2);
        assert_eq!(a.next_snapshot().await, Some(vec![peer("id1")]));
        assert_eq!(b.next_snapshot().await, Some(vec![peer("id1")]));
    }

    #[tokio::test]
    async fn dropped_streams_are_pruned() {
        let mut mux = Multiplexer::new();
        let _kept = mux.subscribe(Vec::new());
        let dropped = mux.subscribe(Vec::new());
        drop(dropped);

        assert_eq!(mux.len(), 2);
        assert_eq!(mux.push(&Vec::new()), 1);
        assert_eq!(mux.len(), 1);
    }

    #[tokio::test]
    async fn close_ends_streams() {
        let mut mux = Multiplexer::new();
        let mut stream = mux.subscribe(Vec::new());
        mux.close();
        assert!(mux.is_empty());
        assert_eq!(stream.next_snapshot().await, Some(Vec::new()));
        assert_eq!(stream.next_snapshot().await, None);
    }

    #[test]
    fn try_next_does_not_block() {
        let mut mux = Multiplexer::new();
        let mut stream = mux.subscribe(Vec::new());
        assert_eq!(stream.try_next_snapshot(), Some(Vec::new()));
        assert_eq!(stream.try_next_snapshot(), None);
    }
}
