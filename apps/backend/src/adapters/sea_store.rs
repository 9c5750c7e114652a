//! Relational persistence gateway on SeaORM.

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, DbErr, TransactionTrait};
use tracing::debug;

use super::games_sea::{self, GameCreate, GameFinish, MoveCreate};
use super::{players_sea, settle};
use crate::domain::leaderboard::rank_order;
use crate::domain::{Board, LeaderboardEntry, OutcomeKind, PlayerId, SessionId};
use crate::entities::games::GameResult;
use crate::errors::domain::DomainError;
use crate::services::gateways::PersistenceGateway;

#[derive(Clone)]
pub struct SeaStore {
    db: DatabaseConnection,
}

impl SeaStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn board_json(grid: &Board) -> Result<String, DomainError> {
    serde_json::to_string(grid).map_err(|e| DomainError::infra(format!("board encode: {e}")))
}

fn game_result(outcome: OutcomeKind) -> GameResult {
    match outcome {
        OutcomeKind::Win => GameResult::Win,
        OutcomeKind::Draw => GameResult::Draw,
        OutcomeKind::Forfeit => GameResult::Forfeit,
    }
}

/// Game row plus every human participant's counters, all or nothing.
async fn finalize_in_txn(
    db: &DatabaseConnection,
    dto: GameFinish,
    winner: Option<PlayerId>,
    outcome: OutcomeKind,
) -> Result<bool, DbErr> {
    let txn = db.begin().await?;
    let game_id = dto.id.clone();

    let out = async {
        if !games_sea::finish_game(&txn, dto).await? {
            return Ok(false);
        }
        let game = games_sea::find_by_id(&txn, &game_id)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("game {game_id} not found")))?;
        let participants = [Some(game.player1_id), game.player2_id];
        for (player_id, result) in settle(participants.into_iter().flatten(), winner, outcome) {
            players_sea::apply_result(&txn, player_id, result).await?;
        }
        Ok::<bool, DbErr>(true)
    }
    .await;

    match out {
        Ok(applied) => {
            txn.commit().await?;
            Ok(applied)
        }
        Err(err) => {
            let _ = txn.rollback().await;
            Err(err)
        }
    }
}

#[async_trait]
impl PersistenceGateway for SeaStore {
    async fn find_or_create_player(&self, username: &str) -> Result<PlayerId, DomainError> {
        let player = players_sea::ensure_player(&self.db, username).await?;
        Ok(player.id)
    }

    async fn create_game(
        &self,
        session_id: SessionId,
        player1: PlayerId,
        player2: Option<PlayerId>,
        grid: &Board,
    ) -> Result<(), DomainError> {
        games_sea::create_game(
            &self.db,
            GameCreate {
                id: session_id.to_string(),
                player1_id: player1,
                player2_id: player2,
                board_state: board_json(grid)?,
            },
        )
        .await?;
        Ok(())
    }

    async fn record_move(
        &self,
        session_id: SessionId,
        player_id: PlayerId,
        column: u8,
        row: u8,
        move_number: u32,
    ) -> Result<(), DomainError> {
        let move_number = i32::try_from(move_number)
            .map_err(|_| DomainError::infra(format!("move number {move_number} out of range")))?;
        games_sea::record_move(
            &self.db,
            MoveCreate {
                game_id: session_id.to_string(),
                player_id,
                column_index: i16::from(column),
                row_index: i16::from(row),
                move_number,
            },
        )
        .await?;
        Ok(())
    }

    async fn finalize_game(
        &self,
        session_id: SessionId,
        winner: Option<PlayerId>,
        outcome: OutcomeKind,
        grid: &Board,
    ) -> Result<(), DomainError> {
        let dto = GameFinish {
            id: session_id.to_string(),
            winner_id: winner,
            result: game_result(outcome),
            board_state: board_json(grid)?,
        };
        let applied = finalize_in_txn(&self.db, dto, winner, outcome).await?;
        if !applied {
            debug!(%session_id, "game already finalized");
        }
        Ok(())
    }

    async fn leaderboard(&self, limit: u16) -> Result<Vec<LeaderboardEntry>, DomainError> {
        let players = players_sea::top_players(&self.db, u64::from(limit)).await?;
        let mut rows: Vec<LeaderboardEntry> = players
            .into_iter()
            .map(|p| {
                LeaderboardEntry::new(
                    p.username,
                    p.total_games,
                    p.total_wins,
                    p.total_losses,
                    p.total_draws,
                )
            })
            .collect();
        // SQL ranks by a float ratio; settle ties on the rounded rate.
        rows.sort_by(|a, b| rank_order(a, b).then_with(|| a.username.cmp(&b.username)));
        Ok(rows)
    }

    fn backend_name(&self) -> &'static str {
        match self.db.get_database_backend() {
            DbBackend::Postgres => "postgres",
            DbBackend::Sqlite => "sqlite",
            _ => "mysql",
        }
    }
}
