//! Ordered, fire-and-forget writes to the persistence gateway.
//!
//! The turn coordinator enqueues while holding a session lock, so enqueueing
//! never awaits. A single consumer task applies commands in order, which keeps
//! a game's row ahead of its moves and its moves ahead of finalization.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;
use tracing::{debug, error, warn};

use super::gateways::PersistenceGateway;
use crate::domain::{Board, OutcomeKind, PlayerId, SessionId};
use crate::errors::domain::DomainError;

const FINALIZE_MAX_ATTEMPTS: u32 = 3;
const FINALIZE_INITIAL_RETRY_DELAY_MS: u64 = 50;
const FINALIZE_MAX_RETRY_DELAY_MS: u64 = 200;

#[derive(Debug)]
enum AuditCommand {
    CreateGame {
        session_id: SessionId,
        player1: PlayerId,
        player2: Option<PlayerId>,
        grid: Board,
    },
    RecordMove {
        session_id: SessionId,
        player_id: PlayerId,
        column: u8,
        row: u8,
        move_number: u32,
    },
    FinalizeGame {
        session_id: SessionId,
        winner: Option<PlayerId>,
        outcome: OutcomeKind,
        grid: Board,
    },
    Flush(oneshot::Sender<()>),
}

#[derive(Clone)]
pub struct AuditWriter {
    tx: mpsc::UnboundedSender<AuditCommand>,
}

impl AuditWriter {
    /// Start the consumer task. Must be called inside a tokio runtime.
    pub fn spawn(gateway: Arc<dyn PersistenceGateway>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(rx, gateway));
        Self { tx }
    }

    pub fn create_game(
        &self,
        session_id: SessionId,
        player1: PlayerId,
        player2: Option<PlayerId>,
        grid: Board,
    ) {
        self.enqueue(AuditCommand::CreateGame {
            session_id,
            player1,
            player2,
            grid,
        });
    }

    pub fn record_move(
        &self,
        session_id: SessionId,
        player_id: PlayerId,
        column: u8,
        row: u8,
        move_number: u32,
    ) {
        self.enqueue(AuditCommand::RecordMove {
            session_id,
            player_id,
            column,
            row,
            move_number,
        });
    }

    pub fn finalize_game(
        &self,
        session_id: SessionId,
        winner: Option<PlayerId>,
        outcome: OutcomeKind,
        grid: Board,
    ) {
        self.enqueue(AuditCommand::FinalizeGame {
            session_id,
            winner,
            outcome,
            grid,
        });
    }

    /// Resolves once every command queued before this call has been applied.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        self.enqueue(AuditCommand::Flush(done));
        let _ = wait.await;
    }

    fn enqueue(&self, cmd: AuditCommand) {
        if let Err(err) = self.tx.send(cmd) {
            warn!(command = ?err.0, "audit queue closed, dropping command");
        }
    }
}

async fn run(mut rx: mpsc::UnboundedReceiver<AuditCommand>, gateway: Arc<dyn PersistenceGateway>) {
    while let Some(cmd) = rx.recv().await {
        match cmd {
            AuditCommand::CreateGame {
                session_id,
                player1,
                player2,
                grid,
            } => {
                if let Err(err) = gateway
                    .create_game(session_id, player1, player2, &grid)
                    .await
                {
                    warn!(%session_id, error = %err, "failed to record game start");
                }
            }
            AuditCommand::RecordMove {
                session_id,
                player_id,
                column,
                row,
                move_number,
            } => {
                if let Err(err) = gateway
                    .record_move(session_id, player_id, column, row, move_number)
                    .await
                {
                    warn!(%session_id, move_number, error = %err, "failed to record move");
                }
            }
            AuditCommand::FinalizeGame {
                session_id,
                winner,
                outcome,
                grid,
            } => {
                if let Err(err) =
                    finalize_with_retry(gateway.as_ref(), session_id, winner, outcome, &grid).await
                {
                    error!(
                        %session_id,
                        outcome = outcome.as_str(),
                        error = %err,
                        "game finalization not persisted"
                    );
                }
            }
            AuditCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("audit queue drained");
}

pub(crate) fn retry_delay(attempt: u32) -> Duration {
    let delay_ms = FINALIZE_INITIAL_RETRY_DELAY_MS
        .saturating_mul(2_u64.pow(attempt.saturating_sub(1)))
        .min(FINALIZE_MAX_RETRY_DELAY_MS);
    Duration::from_millis(delay_ms)
}

async fn finalize_with_retry(
    gateway: &dyn PersistenceGateway,
    session_id: SessionId,
    winner: Option<PlayerId>,
    outcome: OutcomeKind,
    grid: &Board,
) -> Result<(), DomainError> {
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match gateway
            .finalize_game(session_id, winner, outcome, grid)
            .await
        {
            Ok(()) => return Ok(()),
            Err(err) => {
                if attempt >= FINALIZE_MAX_ATTEMPTS || !err.is_transient() {
                    return Err(err);
                }
                let delay = retry_delay(attempt);
                warn!(
                    %session_id,
                    error = %err,
                    attempt,
                    retry_delay_ms = delay.as_millis() as u64,
                    "finalize failed, retrying"
                );
                sleep(delay).await;
            }
        }
    }
}
