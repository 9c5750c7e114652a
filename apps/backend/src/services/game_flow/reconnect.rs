use std::sync::Arc;

use tracing::{debug, info, warn};

use super::GameFlowService;
use crate::domain::{ConnectionId, ConnectionState, SessionId, Slot};
use crate::errors::domain::{DomainError, GameErrorKind};
use crate::protocol::ServerMsg;
use crate::services::registry::SeatRef;
use crate::services::validation;

impl GameFlowService {
    /// Transport reported that `connection` is gone.
    ///
    /// A waiting player leaves the queue. A player seated in an Active
    /// session is marked Disconnected and gets a reconnect deadline.
    pub fn handle_disconnect(self: &Arc<Self>, connection: ConnectionId) {
        if let Some(entry) = self.matchmaker.remove_connection(connection) {
            info!(conn_id = %connection, ticket = entry.ticket, "left matchmaking queue");
            return;
        }

        let Some((seat, handle)) = self.registry.session_for_connection(connection) else {
            return;
        };

        let mut session = handle.lock();
        if session.slot(seat.slot).connection != Some(connection) {
            // The slot was already taken over by a newer connection.
            self.registry.unbind_if(connection, seat);
            return;
        }
        if !session.is_active() {
            self.registry.unbind_if(connection, seat);
            return;
        }

        let epoch = session.mark_disconnected(seat.slot);
        if let Some(peer) = session.slot(seat.slot.other()).live_connection() {
            self.transport.send_to(peer, ServerMsg::OpponentDisconnected);
        }
        info!(
            session_id = %seat.session_id,
            slot = seat.slot.number(),
            epoch,
            timeout_ms = self.config.reconnect_timeout.as_millis() as u64,
            "player disconnected, awaiting reconnect"
        );
        self.arm_reconnect_deadline(seat.session_id, seat.slot, epoch);
    }

    fn arm_reconnect_deadline(self: &Arc<Self>, session_id: SessionId, slot: Slot, epoch: u64) {
        let cancel = self.timers.arm((session_id, slot), epoch);
        let service = Arc::clone(self);
        let timeout = self.config.reconnect_timeout;
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(%session_id, slot = slot.number(), epoch, "reconnect deadline cancelled");
                }
                _ = tokio::time::sleep(timeout) => {
                    service.reconnect_deadline_passed(session_id, slot, epoch);
                }
            }
        });
    }

    /// Forfeit `slot` unless it came back or the session moved on.
    fn reconnect_deadline_passed(self: &Arc<Self>, session_id: SessionId, slot: Slot, epoch: u64) {
        self.timers.disarm_if((session_id, slot), epoch);
        let Some(handle) = self.registry.get(session_id) else {
            return;
        };

        let mut session = handle.lock();
        let seat = session.slot(slot);
        if !session.is_active()
            || seat.connection_state != ConnectionState::Disconnected
            || seat.disconnect_epoch != epoch
        {
            debug!(%session_id, slot = slot.number(), epoch, "stale reconnect deadline");
            return;
        }

        match session.forfeit(slot) {
            Ok(outcome) => {
                info!(%session_id, slot = slot.number(), "reconnect window expired, forfeiting");
                self.publish_finish(&session, outcome);
            }
            Err(err) => warn!(%session_id, error = %err, "forfeit rejected"),
        }
    }

    /// Handle `reconnectGame`: rebind `slot` of `session_id` to `connection`.
    pub fn reconnect(
        self: &Arc<Self>,
        connection: ConnectionId,
        session_id: SessionId,
        slot: i64,
    ) -> Result<(), DomainError> {
        let slot = validation::slot(slot)?;
        let handle = self
            .registry
            .get(session_id)
            .ok_or_else(|| DomainError::game(GameErrorKind::SessionNotFound, "Game not found"))?;

        // A connection holds at most one live seat, including the other slot
        // of this same session.
        if let Some((bound, bound_handle)) = self.registry.session_for_connection(connection) {
            let same_seat = bound.session_id == session_id && bound.slot == slot;
            if !same_seat && bound_handle.lock().is_active() {
                return Err(DomainError::game(
                    GameErrorKind::AlreadyInGame,
                    "Already in an active game",
                ));
            }
        }

        let mut session = handle.lock();
        let seat = session.slot(slot);
        if seat.identity.is_bot() {
            return Err(DomainError::game(
                GameErrorKind::BotSlot,
                "Cannot take over the bot's slot",
            ));
        }

        if !session.is_active() {
            self.transport.send_to(connection, Self::snapshot(&session));
            return Ok(());
        }

        let was_disconnected = seat.connection_state == ConnectionState::Disconnected;
        self.timers.cancel((session_id, slot));
        let previous = session.mark_connected(slot, connection);

        let seat_ref = SeatRef { session_id, slot };
        self.registry.bind_connection(connection, seat_ref);
        if let Some(old) = previous.filter(|old| *old != connection) {
            self.registry.unbind_if(old, seat_ref);
            self.transport.leave_room(old, session_id);
        }

        self.transport.join_room(connection, session_id);
        self.transport.send_to(connection, Self::snapshot(&session));
        if was_disconnected {
            if let Some(peer) = session.slot(slot.other()).live_connection() {
                self.transport.send_to(peer, ServerMsg::OpponentReconnected);
            }
        }
        info!(
            %session_id,
            conn_id = %connection,
            slot = slot.number(),
            "player reconnected"
        );
        Ok(())
    }
}
