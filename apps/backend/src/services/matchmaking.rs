//! FIFO matchmaking queue.
//!
//! The queue lock is its own serialization domain: popping a waiter and
//! creating its session happen under it, so a waiting entry is consumed by a
//! human match or by its bot fallback, never both.

use std::collections::VecDeque;

use parking_lot::Mutex;
use time::OffsetDateTime;

use super::registry::{SessionHandle, SessionRegistry};
use crate::domain::{ConnectionId, PlayerId, PlayerSlot};
use crate::errors::domain::{DomainError, GameErrorKind};

/// Identifies one enqueue; a fallback timer only acts on its own ticket.
pub type Ticket = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitingEntry {
    pub ticket: Ticket,
    pub player_id: PlayerId,
    pub username: String,
    pub connection: ConnectionId,
    pub enqueued_at: OffsetDateTime,
}

impl WaitingEntry {
    fn into_slot(self) -> PlayerSlot {
        PlayerSlot::human(self.player_id, self.username, self.connection)
    }
}

/// A player asking for a game.
#[derive(Debug, Clone)]
pub struct Seeker {
    pub player_id: PlayerId,
    pub username: String,
    pub connection: ConnectionId,
}

pub enum JoinResult {
    /// Paired with the earliest waiter, who took slot 1.
    Matched {
        session: SessionHandle,
        waiter: WaitingEntry,
    },
    /// Nobody was waiting; arm the fallback for this ticket.
    Queued { ticket: Ticket },
}

#[derive(Default)]
struct Queue {
    entries: VecDeque<WaitingEntry>,
    next_ticket: Ticket,
}

#[derive(Default)]
pub struct Matchmaker {
    queue: Mutex<Queue>,
}

impl Matchmaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair `seeker` with the earliest waiter or enqueue them.
    ///
    /// Both join guards are re-checked under the queue lock; callers may have
    /// awaited since their own checks.
    pub fn join(
        &self,
        seeker: Seeker,
        registry: &SessionRegistry,
    ) -> Result<JoinResult, DomainError> {
        let mut queue = self.queue.lock();
        if queue
            .entries
            .iter()
            .any(|e| e.connection == seeker.connection)
        {
            return Err(DomainError::game(
                GameErrorKind::AlreadyQueued,
                "Already waiting for an opponent",
            ));
        }
        if let Some((_, handle)) = registry.session_for_connection(seeker.connection) {
            if handle.lock().is_active() {
                return Err(DomainError::game(
                    GameErrorKind::AlreadyInGame,
                    "Already in an active game",
                ));
            }
        }

        if let Some(waiter) = queue.entries.pop_front() {
            let session = registry.create(
                waiter.clone().into_slot(),
                PlayerSlot::human(seeker.player_id, seeker.username, seeker.connection),
            );
            return Ok(JoinResult::Matched { session, waiter });
        }

        queue.next_ticket += 1;
        let ticket = queue.next_ticket;
        queue.entries.push_back(WaitingEntry {
            ticket,
            player_id: seeker.player_id,
            username: seeker.username,
            connection: seeker.connection,
            enqueued_at: OffsetDateTime::now_utc(),
        });
        Ok(JoinResult::Queued { ticket })
    }

    /// Fallback timer fired: if `ticket` is still waiting, seat it against
    /// `bot` as slot 1. Returns `None` when the entry was already consumed.
    pub fn expire(
        &self,
        ticket: Ticket,
        registry: &SessionRegistry,
        bot: PlayerSlot,
    ) -> Option<(SessionHandle, WaitingEntry)> {
        let mut queue = self.queue.lock();
        let pos = queue.entries.iter().position(|e| e.ticket == ticket)?;
        let waiter = queue.entries.remove(pos)?;
        let session = registry.create(waiter.clone().into_slot(), bot);
        Some((session, waiter))
    }

    /// Drop a connection's entry, e.g. when it disconnects while waiting.
    pub fn remove_connection(&self, connection: ConnectionId) -> Option<WaitingEntry> {
        let mut queue = self.queue.lock();
        let pos = queue
            .entries
            .iter()
            .position(|e| e.connection == connection)?;
        queue.entries.remove(pos)
    }

    pub fn is_waiting(&self, connection: ConnectionId) -> bool {
        self.queue
            .lock()
            .entries
            .iter()
            .any(|e| e.connection == connection)
    }

    pub fn len(&self) -> usize {
        self.queue.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
