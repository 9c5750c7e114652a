use std::sync::Arc;

use tracing::{debug, info};

use super::GameFlowService;
use crate::domain::{ConnectionId, PlayerSlot, Session};
use crate::errors::domain::{DomainError, GameErrorKind};
use crate::protocol::ServerMsg;
use crate::services::matchmaking::{JoinResult, Seeker, Ticket};
use crate::services::registry::SessionHandle;
use crate::services::validation;

impl GameFlowService {
    /// Handle `joinGame` / `newGame` from `connection`.
    ///
    /// Pairs with the earliest waiter or enqueues and arms the bot fallback.
    pub async fn join_game(
        self: &Arc<Self>,
        connection: ConnectionId,
        username: &str,
    ) -> Result<(), DomainError> {
        let username = validation::normalize_username(username)?;
        self.ensure_free(connection)?;

        let player_id = self.store.find_or_create_player(&username).await?;
        let seeker = Seeker {
            player_id,
            username,
            connection,
        };

        match self.matchmaker.join(seeker, &self.registry)? {
            JoinResult::Matched { session, waiter } => {
                debug!(
                    conn_id = %connection,
                    waited_for = %waiter.username,
                    "paired with waiting player"
                );
                self.announce(&session);
            }
            JoinResult::Queued { ticket } => {
                info!(conn_id = %connection, player_id, ticket, "waiting for opponent");
                self.schedule_fallback(ticket);
            }
        }
        Ok(())
    }

    /// Reject connections already queued or seated in a live game; release
    /// a seat in a finished one so the player can queue again.
    fn ensure_free(&self, connection: ConnectionId) -> Result<(), DomainError> {
        if self.matchmaker.is_waiting(connection) {
            return Err(DomainError::game(
                GameErrorKind::AlreadyQueued,
                "Already waiting for an opponent",
            ));
        }
        let Some((seat, handle)) = self.registry.session_for_connection(connection) else {
            return Ok(());
        };
        if handle.lock().is_active() {
            return Err(DomainError::game(
                GameErrorKind::AlreadyInGame,
                "Already in an active game",
            ));
        }
        self.registry.unbind_if(connection, seat);
        self.transport.leave_room(connection, seat.session_id);
        Ok(())
    }

    fn schedule_fallback(self: &Arc<Self>, ticket: Ticket) {
        let service = Arc::clone(self);
        let delay = self.config.matchmaking_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let bot = PlayerSlot::bot(service.config.bot_name.clone());
            match service.matchmaker.expire(ticket, &service.registry, bot) {
                Some((session, waiter)) => {
                    info!(
                        conn_id = %waiter.connection,
                        ticket,
                        "no opponent found, starting bot game"
                    );
                    service.announce(&session);
                }
                None => debug!(ticket, "fallback timer stale"),
            }
        });
    }

    /// Seat both humans in the room, send `gameFound`, open the audit record.
    fn announce(&self, handle: &SessionHandle) {
        let session = handle.lock();
        for (slot, seat) in session.slots() {
            let Some(conn) = seat.live_connection() else {
                continue;
            };
            let opponent = session.slot(slot.other());
            self.transport.join_room(conn, session.id);
            self.transport.send_to(
                conn,
                ServerMsg::GameFound {
                    session_id: session.id,
                    opponent_name: opponent.name.clone(),
                    opponent_is_bot: opponent.identity.is_bot(),
                    assigned_slot: slot,
                    grid: *session.board(),
                    current_slot: session.current_slot(),
                },
            );
        }
        self.open_audit(&session);
        info!(
            session_id = %session.id,
            vs_bot = session.has_bot(),
            "game started"
        );
    }

    fn open_audit(&self, session: &Session) {
        let mut ids = session.slots().map(|(_, s)| s.identity.player_id());
        let (first, second) = (ids.next().flatten(), ids.next().flatten());
        match first {
            Some(player1) => self
                .audit
                .create_game(session.id, player1, second, *session.board()),
            None => debug!(session_id = %session.id, "slot 1 has no player id, game not audited"),
        }
    }
}
