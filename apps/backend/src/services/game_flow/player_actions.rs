use std::sync::Arc;

use tracing::{debug, info};

use super::GameFlowService;
use crate::domain::{ConnectionId, MoveApplied, Session, Slot};
use crate::errors::domain::{DomainError, GameErrorKind};
use crate::protocol::ServerMsg;
use crate::services::registry::SessionHandle;
use crate::services::validation;

impl GameFlowService {
    /// Handle `makeMove` from `connection`.
    pub fn make_move(
        self: &Arc<Self>,
        connection: ConnectionId,
        column: i64,
    ) -> Result<MoveApplied, DomainError> {
        let column = validation::column(column)?;
        let (seat, handle) = self
            .registry
            .session_for_connection(connection)
            .ok_or_else(|| DomainError::game(GameErrorKind::NotInGame, "Not in a game"))?;

        let mut session = handle.lock();
        let applied = self.commit_move(&mut session, seat.slot, column)?;
        debug!(
            session_id = %seat.session_id,
            conn_id = %connection,
            slot = seat.slot.number(),
            column,
            row = applied.row,
            "move applied"
        );
        Ok(applied)
    }

    /// Apply a move on a locked session and emit everything that follows
    /// from it: audit row, `moveMade`, then either the finish or the bot's
    /// turn. Shared by human and bot moves.
    pub(super) fn commit_move(
        self: &Arc<Self>,
        session: &mut Session,
        slot: Slot,
        column: usize,
    ) -> Result<MoveApplied, DomainError> {
        let applied = session.apply_move(slot, column)?;

        if let Some(player_id) = session.slot(slot).identity.player_id() {
            self.audit.record_move(
                session.id,
                player_id,
                applied.column as u8,
                applied.row as u8,
                applied.move_number,
            );
        }

        self.transport.broadcast(
            session.id,
            ServerMsg::MoveMade {
                grid: *session.board(),
                current_slot: session.current_slot(),
                column: applied.column,
                row: applied.row,
            },
        );

        match applied.outcome {
            Some(outcome) => self.publish_finish(session, outcome),
            None if session.is_bot_turn() => {
                self.schedule_bot_turn(session.id, session.move_count());
            }
            None => {}
        }
        Ok(applied)
    }

    /// Lock `handle` and apply a move only if no other move landed since
    /// `expected_moves` was read. Returns `None` when the turn went stale.
    pub(super) fn commit_if_current(
        self: &Arc<Self>,
        handle: &SessionHandle,
        slot: Slot,
        column: usize,
        expected_moves: u32,
    ) -> Result<Option<MoveApplied>, DomainError> {
        let mut session = handle.lock();
        if !session.is_active()
            || session.move_count() != expected_moves
            || session.current_slot() != slot
        {
            info!(
                session_id = %session.id,
                expected_moves,
                actual_moves = session.move_count(),
                "discarding stale move"
            );
            return Ok(None);
        }
        self.commit_move(&mut session, slot, column).map(Some)
    }
}
