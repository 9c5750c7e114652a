//! Live sessions and the connection → seat index.
//!
//! Each session sits behind its own mutex so different sessions never
//! contend. Registry methods clone the `Arc` out of the map before locking a
//! session; no map guard is held while a session lock is taken.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::Mutex;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{ConnectionId, PlayerSlot, Session, SessionId, Slot};

pub type SessionHandle = Arc<Mutex<Session>>;

/// Where a connection sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatRef {
    pub session_id: SessionId,
    pub slot: Slot,
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, SessionHandle>,
    connections: DashMap<ConnectionId, SeatRef>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an Active session and bind both human connections to it.
    pub fn create(&self, first: PlayerSlot, second: PlayerSlot) -> SessionHandle {
        let id = Uuid::new_v4();
        let session = Session::new(id, first, second);
        for (slot, seat) in session.slots() {
            if let Some(conn) = seat.connection {
                self.connections.insert(conn, SeatRef { session_id: id, slot });
            }
        }
        let handle = Arc::new(Mutex::new(session));
        self.sessions.insert(id, Arc::clone(&handle));
        debug!(session_id = %id, "session created");
        handle
    }

    pub fn get(&self, session_id: SessionId) -> Option<SessionHandle> {
        self.sessions.get(&session_id).map(|h| Arc::clone(h.value()))
    }

    pub fn find_by_connection(&self, connection: ConnectionId) -> Option<SeatRef> {
        self.connections.get(&connection).map(|s| *s.value())
    }

    pub fn session_for_connection(
        &self,
        connection: ConnectionId,
    ) -> Option<(SeatRef, SessionHandle)> {
        let seat = self.find_by_connection(connection)?;
        let handle = self.get(seat.session_id)?;
        Some((seat, handle))
    }

    pub fn bind_connection(&self, connection: ConnectionId, seat: SeatRef) {
        self.connections.insert(connection, seat);
    }

    /// Remove the mapping only if it still points at `seat`.
    pub fn unbind_if(&self, connection: ConnectionId, seat: SeatRef) -> bool {
        self.connections
            .remove_if(&connection, |_, current| *current == seat)
            .is_some()
    }

    /// Drop a session and every connection mapping that points at it.
    pub fn remove(&self, session_id: SessionId) -> Option<SessionHandle> {
        let (_, handle) = self.sessions.remove(&session_id)?;
        self.connections
            .retain(|_, seat| seat.session_id != session_id);
        Some(handle)
    }

    /// Remove Finished sessions completed more than `ttl` before `now`.
    pub fn sweep_finished(&self, ttl: Duration, now: OffsetDateTime) -> Vec<SessionId> {
        let handles: Vec<(SessionId, SessionHandle)> = self
            .sessions
            .iter()
            .map(|e| (*e.key(), Arc::clone(e.value())))
            .collect();

        let expired: Vec<SessionId> = handles
            .into_iter()
            .filter(|(_, handle)| {
                let session = handle.lock();
                match session.completed_at() {
                    Some(done) if !session.is_active() => now - done >= ttl,
                    _ => false,
                }
            })
            .map(|(id, _)| id)
            .collect();

        for id in &expired {
            self.remove(*id);
        }
        expired
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn active_count(&self) -> usize {
        let handles: Vec<SessionHandle> =
            self.sessions.iter().map(|e| Arc::clone(e.value())).collect();
        handles.iter().filter(|h| h.lock().is_active()).count()
    }
}
