//! Public store handle and the background task that owns presence state.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use roster_common::{PresenceError, SessionId};

use crate::channel::Channel;
use crate::protocol::{strip_reserved, Envelope, Payload, PresenceMessage};

use super::multiplexer::{Multiplexer, PresenceStream, SnapshotSink};
use super::repository::StateRepository;
use super::router::{route, Routed};
use super::timer::Deadline;
use super::types::PresenceConfig;

/// Requests from the handle to the store task.
enum Command {
    Report(Payload),
    Attach(SnapshotSink),
    Close,
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Handle to one presence store.
///
/// Every store owns its own session id, repository, observers and timers,
/// all held by a background task. Dropping the handle closes the store the
/// same way `close` does.
pub struct PresenceStore {
    session: SessionId,
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl PresenceStore {
    /// Open a store on `channel`: subscribe, send a roll call, and start
    /// the background task. Must be called inside a tokio runtime.
    ///
    /// Timings below one millisecond are raised to one millisecond.
    pub fn open(channel: Arc<dyn Channel>, config: PresenceConfig) -> Self {
        let session = SessionId::new();
        let clamped = config.clone().clamped();
        if clamped != config {
            warn!(session = %session, "Presence timings below 1ms raised to 1ms");
        }
        let config = clamped;
        let inbound = channel.listen();
        channel.send(PresenceMessage::roll_call(session.as_str()));

        let (commands, command_rx) = mpsc::unbounded_channel();
        let actor = StoreActor {
            session: session.clone(),
            channel,
            config,
            repository: StateRepository::new(),
            my_state: None,
            subscribers: Multiplexer::new(),
            heartbeat: Deadline::new(),
            debounce: Deadline::new(),
        };
        let task = tokio::spawn(actor.run(command_rx, inbound));

        info!(session = %session, "Presence store opened");
        Self {
            session,
            commands,
            task,
        }
    }

    /// This store's session id.
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// Replace our own state, broadcast it now and restart the heartbeat.
    pub fn report_my_state(&self, state: Payload) {
        if self.commands.send(Command::Report(state)).is_err() {
            debug!(session = %self.session, "Report dropped: store is closed");
        }
    }

    /// Typed variant of [`report_my_state`](Self::report_my_state).
    ///
    /// `state` must serialize to a JSON object.
    pub fn report<T: Serialize>(&self, state: &T) -> Result<(), PresenceError> {
        let payload = match serde_json::to_value(state) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(PresenceError::InvalidPayload(format!(
                    "expected a JSON object, got {other}"
                )))
            }
            Err(e) => return Err(PresenceError::InvalidPayload(e.to_string())),
        };
        self.commands
            .send(Command::Report(payload))
            .map_err(|_| PresenceError::Closed)
    }

    /// Subscribe to presence snapshots.
    ///
    /// The first snapshot is the current one. It is delivered by the store
    /// task, so it becomes available after that task's next turn rather
    /// than on return; `try_next_snapshot` right after subscribing may
    /// still see nothing. It never waits for the debounce. On a closed
    /// store the stream ends immediately.
    pub fn presence(&self) -> PresenceStream {
        let (sink, stream) = PresenceStream::channel();
        let _ = self.commands.send(Command::Attach(sink));
        stream
    }

    /// Whether the background task has stopped.
    pub fn is_closed(&self) -> bool {
        self.task.is_finished()
    }

    /// Send the disconnect beacon, unsubscribe, cancel all timers and end
    /// every presence stream. Resolves once the store task has finished.
    pub async fn close(self) {
        let Self {
            session,
            commands,
            task,
        } = self;
        let _ = commands.send(Command::Close);
        drop(commands);
        if let Err(e) = task.await {
            warn!(session = %session, error = %e, "Presence store task failed");
        }
    }
}

impl std::fmt::Debug for PresenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceStore")
            .field("session", &self.session)
            .field("closed", &self.is_closed())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Store task
// ---------------------------------------------------------------------------

struct StoreActor {
    session: SessionId,
    channel: Arc<dyn Channel>,
    config: PresenceConfig,
    repository: StateRepository,
    my_state: Option<Payload>,
    subscribers: Multiplexer,
    heartbeat: Deadline,
    debounce: Deadline,
}

impl StoreActor {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut inbound: mpsc::UnboundedReceiver<Envelope>,
    ) {
        let period = self.config.purge_interval;
        let mut purge = tokio::time::interval_at(Instant::now() + period, period);
        purge.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Report(state)) => self.report(state),
                    Some(Command::Attach(sink)) => {
                        self.subscribers.attach(sink, self.repository.snapshot());
                    }
                    Some(Command::Close) | None => break,
                },
                envelope = inbound.recv() => match envelope {
                    Some(envelope) => self.dispatch(envelope),
                    None => {
                        warn!(session = %self.session, "Presence channel closed its inbound stream");
                        break;
                    }
                },
                () = self.heartbeat.elapsed() => self.broadcast_my_state(),
                _ = purge.tick() => self.purge(),
                () = self.debounce.elapsed() => self.notify(),
            }
        }

        self.channel
            .send_beacon(PresenceMessage::disconnect(self.session.as_str()));
        drop(inbound);
        drop(purge);
        self.heartbeat.cancel();
        self.debounce.cancel();
        self.subscribers.close();
        info!(session = %self.session, "Presence store closed");
    }

    fn report(&mut self, state: Payload) {
        self.my_state = Some(strip_reserved(state));
        self.broadcast_my_state();
    }

    /// Send our state and push the next heartbeat a full interval out.
    fn broadcast_my_state(&mut self) {
        let Some(state) = &self.my_state else {
            debug!(session = %self.session, "No local state reported yet, nothing to announce");
            return;
        };
        self.channel
            .send(PresenceMessage::state(self.session.as_str(), state.clone()));
        self.heartbeat.schedule_after(self.config.resend_interval);
    }

    fn dispatch(&mut self, envelope: Envelope) {
        match route(
            &mut self.repository,
            &self.session,
            envelope,
            Instant::now(),
        ) {
            Routed::Changed => self.mark_changed(),
            Routed::RollCall => self.broadcast_my_state(),
            Routed::Refreshed | Routed::Ignored => {}
        }
    }

    fn purge(&mut self) {
        let evicted = self
            .repository
            .purge_stale(Instant::now(), self.config.state_timeout);
        if evicted.is_empty() {
            return;
        }
        for key in &evicted {
            info!(peer = %key, "Evicting stale peer");
        }
        self.mark_changed();
    }

    fn mark_changed(&mut self) {
        self.debounce.schedule_after(self.config.debounce);
    }

    fn notify(&mut self) {
        let snapshot = self.repository.snapshot();
        let delivered = self.subscribers.push(&snapshot);
        debug!(
            peers = snapshot.len(),
            subscribers = delivered,
            "Presence snapshot published"
        );
    }
}
