//! Seams between the game core and the outside world.
//!
//! The core never awaits transport delivery and never blocks on the store
//! while holding a session lock; both traits are implemented by adapters
//! (`ws::hub::ConnectionHub`, `adapters::MemoryStore`, `adapters::SeaStore`)
//! and by test fakes.

use async_trait::async_trait;

use crate::domain::{
    Board, ConnectionId, LeaderboardEntry, OutcomeKind, PlayerId, SessionId,
};
use crate::errors::domain::DomainError;
use crate::protocol::ServerMsg;

/// Audit store for players, games and moves.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Idempotent on username.
    async fn find_or_create_player(&self, username: &str) -> Result<PlayerId, DomainError>;

    async fn create_game(
        &self,
        session_id: SessionId,
        player1: PlayerId,
        player2: Option<PlayerId>,
        grid: &Board,
    ) -> Result<(), DomainError>;

    async fn record_move(
        &self,
        session_id: SessionId,
        player_id: PlayerId,
        column: u8,
        row: u8,
        move_number: u32,
    ) -> Result<(), DomainError>;

    /// Close the game and update every human participant's counters in one
    /// atomic step. `winner` is `None` for a draw or when the bot won.
    async fn finalize_game(
        &self,
        session_id: SessionId,
        winner: Option<PlayerId>,
        outcome: OutcomeKind,
        grid: &Board,
    ) -> Result<(), DomainError>;

    /// Players with at least one game, wins desc then win rate desc.
    async fn leaderboard(&self, limit: u16) -> Result<Vec<LeaderboardEntry>, DomainError>;

    /// Short label for health output.
    fn backend_name(&self) -> &'static str;
}

/// Event delivery to connected clients. Calls are fire-and-forget.
pub trait TransportGateway: Send + Sync {
    /// Point delivery to one connection.
    fn send_to(&self, connection: ConnectionId, msg: ServerMsg);

    /// Deliver to every connection in the session's room.
    fn broadcast(&self, session_id: SessionId, msg: ServerMsg);

    fn join_room(&self, connection: ConnectionId, session_id: SessionId);

    fn leave_room(&self, connection: ConnectionId, session_id: SessionId);
}
