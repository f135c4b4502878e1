//! Resettable deadline shared by the heartbeat and the debounce.

use std::future;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::{Instant, Sleep};

/// A one-shot timer where every `schedule_after` replaces the pending expiry.
///
/// Idle deadlines never fire. `elapsed` is cancellation safe: dropping the
/// future leaves the deadline armed, so it can sit in a `select!` loop.
#[derive(Debug, Default)]
pub struct Deadline {
    sleep: Option<Pin<Box<Sleep>>>,
}

impl Deadline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the deadline `after` from now, cancelling any pending expiry.
    pub fn schedule_after(&mut self, after: Duration) {
        let at = Instant::now() + after;
        match &mut self.sleep {
            Some(sleep) => sleep.as_mut().reset(at),
            None => self.sleep = Some(Box::pin(tokio::time::sleep_until(at))),
        }
    }

    pub fn cancel(&mut self) {
        self.sleep = None;
    }

    pub fn is_armed(&self) -> bool {
        self.sleep.is_some()
    }

    /// When the pending expiry is due, if armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.sleep.as_ref().map(|sleep| sleep.deadline())
    }

    /// Resolve once the armed expiry passes, disarming the deadline.
    pub async fn elapsed(&mut self) {
        match &mut self.sleep {
            Some(sleep) => {
                sleep.as_mut().await;
                self.sleep = None;
            }
            None => future::pending().await,
        }
    }
}
