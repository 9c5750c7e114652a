//! In-process persistence gateway.
//!
//! Mirrors the relational store's behaviour closely enough for tests and for
//! running without a database: unique usernames, one row per game, unique
//! move numbers per game, and finalization that is applied at most once.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use time::OffsetDateTime;

use super::players_sea::PlayerResult;
use super::settle;
use crate::domain::leaderboard::rank_order;
use crate::domain::{Board, LeaderboardEntry, OutcomeKind, PlayerId, SessionId};
use crate::errors::domain::{DomainError, PersistenceKind};
use crate::services::gateways::PersistenceGateway;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub username: String,
    pub total_games: i32,
    pub total_wins: i32,
    pub total_losses: i32,
    pub total_draws: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub id: SessionId,
    pub player1_id: PlayerId,
    pub player2_id: Option<PlayerId>,
    pub winner_id: Option<PlayerId>,
    pub outcome: Option<OutcomeKind>,
    pub board: Board,
    pub started_at: OffsetDateTime,
    pub ended_at: Option<OffsetDateTime>,
}

impl GameRecord {
    pub fn is_finished(&self) -> bool {
        self.ended_at.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub player_id: PlayerId,
    pub column: u8,
    pub row: u8,
    pub move_number: u32,
}

#[derive(Default)]
struct Tables {
    next_player_id: PlayerId,
    players: HashMap<PlayerId, PlayerRecord>,
    usernames: HashMap<String, PlayerId>,
    games: HashMap<SessionId, GameRecord>,
    moves: HashMap<SessionId, Vec<MoveRecord>>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player(&self, username: &str) -> Option<PlayerRecord> {
        let tables = self.tables.lock();
        let id = tables.usernames.get(username)?;
        tables.players.get(id).cloned()
    }

    pub fn game(&self, session_id: SessionId) -> Option<GameRecord> {
        self.tables.lock().games.get(&session_id).cloned()
    }

    pub fn moves(&self, session_id: SessionId) -> Vec<MoveRecord> {
        self.tables
            .lock()
            .moves
            .get(&session_id)
            .cloned()
            .unwrap_or_default()
    }
}

fn not_found(what: impl Into<String>) -> DomainError {
    DomainError::persistence(PersistenceKind::NotFound, what)
}

#[async_trait]
impl PersistenceGateway for MemoryStore {
    async fn find_or_create_player(&self, username: &str) -> Result<PlayerId, DomainError> {
        let mut tables = self.tables.lock();
        if let Some(id) = tables.usernames.get(username) {
            return Ok(*id);
        }
        tables.next_player_id += 1;
        let id = tables.next_player_id;
        tables.usernames.insert(username.to_owned(), id);
        tables.players.insert(
            id,
            PlayerRecord {
                id,
                username: username.to_owned(),
                total_games: 0,
                total_wins: 0,
                total_losses: 0,
                total_draws: 0,
            },
        );
        Ok(id)
    }

    async fn create_game(
        &self,
        session_id: SessionId,
        player1: PlayerId,
        player2: Option<PlayerId>,
        grid: &Board,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.lock();
        if tables.games.contains_key(&session_id) {
            return Err(DomainError::persistence(
                PersistenceKind::Query,
                format!("game {session_id} already exists"),
            ));
        }
        tables.games.insert(
            session_id,
            GameRecord {
                id: session_id,
                player1_id: player1,
                player2_id: player2,
                winner_id: None,
                outcome: None,
                board: *grid,
                started_at: OffsetDateTime::now_utc(),
                ended_at: None,
            },
        );
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
        let mut tables = self.tables.lock();
        if !tables.games.contains_key(&session_id) {
            return Err(not_found(format!("game {session_id} not found")));
        }
        let log = tables.moves.entry(session_id).or_default();
        if log.iter().any(|m| m.move_number == move_number) {
            return Err(DomainError::persistence(
                PersistenceKind::Query,
                format!("move {move_number} already recorded for {session_id}"),
            ));
        }
        log.push(MoveRecord {
            player_id,
            column,
            row,
            move_number,
        });
        Ok(())
    }

    async fn finalize_game(
        &self,
        session_id: SessionId,
        winner: Option<PlayerId>,
        outcome: OutcomeKind,
        grid: &Board,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.lock();
        let game = tables
            .games
            .get(&session_id)
            .ok_or_else(|| not_found(format!("game {session_id} not found")))?;
        if game.is_finished() {
            return Ok(());
        }
        let participants = [Some(game.player1_id), game.player2_id];
        let updates = settle(participants.into_iter().flatten(), winner, outcome);
        if let Some((missing, _)) = updates
            .iter()
            .find(|(id, _)| !tables.players.contains_key(id))
        {
            return Err(not_found(format!("player {missing} not found")));
        }

        for (id, result) in updates {
            if let Some(player) = tables.players.get_mut(&id) {
                player.total_games += 1;
                match result {
                    PlayerResult::Win => player.total_wins += 1,
                    PlayerResult::Loss => player.total_losses += 1,
                    PlayerResult::Draw => player.total_draws += 1,
                }
            }
        }
        if let Some(game) = tables.games.get_mut(&session_id) {
            game.winner_id = winner;
            game.outcome = Some(outcome);
            game.board = *grid;
            game.ended_at = Some(OffsetDateTime::now_utc());
        }
        Ok(())
    }

    async fn leaderboard(&self, limit: u16) -> Result<Vec<LeaderboardEntry>, DomainError> {
        let tables = self.tables.lock();
        let mut rows: Vec<LeaderboardEntry> = tables
            .players
            .values()
            .filter(|p| p.total_games > 0)
            .map(|p| {
                LeaderboardEntry::new(
                    p.username.clone(),
                    p.total_games,
                    p.total_wins,
                    p.total_losses,
                    p.total_draws,
                )
            })
            .collect();
        rows.sort_by(|a, b| rank_order(a, b).then_with(|| a.username.cmp(&b.username)));
        rows.truncate(usize::from(limit));
        Ok(rows)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
