//! Reconnect deadlines, at most one per (session, slot).

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;

use crate::domain::{SessionId, Slot};

pub type TimerKey = (SessionId, Slot);

struct ArmedTimer {
    epoch: u64,
    cancel: CancellationToken,
}

#[derive(Default)]
pub struct ReconnectTimers {
    timers: DashMap<TimerKey, ArmedTimer>,
}

impl ReconnectTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a deadline for `key`, cancelling any previous one. The
    /// returned token fires if the deadline is cancelled before expiry.
    pub fn arm(&self, key: TimerKey, epoch: u64) -> CancellationToken {
        let cancel = CancellationToken::new();
        let previous = self.timers.insert(
            key,
            ArmedTimer {
                epoch,
                cancel: cancel.clone(),
            },
        );
        if let Some(prev) = previous {
            prev.cancel.cancel();
        }
        cancel
    }

    pub fn cancel(&self, key: TimerKey) -> bool {
        match self.timers.remove(&key) {
            Some((_, timer)) => {
                timer.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Forget a fired deadline, unless a newer one replaced it.
    pub fn disarm_if(&self, key: TimerKey, epoch: u64) {
        self.timers.remove_if(&key, |_, timer| timer.epoch == epoch);
    }

    pub fn cancel_session(&self, session_id: SessionId) {
        for slot in Slot::BOTH {
            self.cancel((session_id, slot));
        }
    }

    pub fn is_armed(&self, key: TimerKey) -> bool {
        self.timers.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
