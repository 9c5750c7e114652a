use std::sync::Arc;

use tracing::{debug, error, warn};

use super::GameFlowService;
use crate::domain::SessionId;
use crate::errors::domain::DomainError;

impl GameFlowService {
    /// Let the bot answer after the configured thinking delay.
    ///
    /// `expected_moves` is the move count the bot is answering; if anything
    /// else happened to the session by the time the delay elapses, the task
    /// does nothing.
    pub(super) fn schedule_bot_turn(self: &Arc<Self>, session_id: SessionId, expected_moves: u32) {
        let service = Arc::clone(self);
        let delay = self.config.bot_move_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = service.play_bot_turn(session_id, expected_moves).await {
                error!(%session_id, error = %err, "bot move failed");
            }
        });
    }

    async fn play_bot_turn(
        self: &Arc<Self>,
        session_id: SessionId,
        expected_moves: u32,
    ) -> Result<(), DomainError> {
        let Some(handle) = self.registry.get(session_id) else {
            debug!(%session_id, "bot turn for removed session");
            return Ok(());
        };

        let (board, bot_slot) = {
            let session = handle.lock();
            if !session.is_bot_turn() || session.move_count() != expected_moves {
                debug!(%session_id, expected_moves, "bot turn stale");
                return Ok(());
            }
            (*session.board(), session.current_slot())
        };

        // The search runs without the session lock.
        let bot = Arc::clone(&self.bot);
        let column = tokio::task::spawn_blocking(move || bot.choose_column(&board, bot_slot))
            .await
            .map_err(|e| DomainError::infra(format!("bot task failed: {e}")))??;

        match self.commit_if_current(&handle, bot_slot, column, expected_moves)? {
            Some(applied) => debug!(
                %session_id,
                column,
                row = applied.row,
                "bot moved"
            ),
            None => warn!(%session_id, column, "bot move discarded, session moved on"),
        }
        Ok(())
    }
}
