//! Domain layer: pure game rules and types, no I/O.

pub mod board;
pub mod leaderboard;
pub mod session;

#[cfg(test)]
mod tests_session;

// Re-exports for ergonomics
pub use board::{Board, Cell, Slot, CENTER_COLUMN, COLS, CONNECT, ROWS};
pub use leaderboard::LeaderboardEntry;
pub use session::{
    ConnectionId, ConnectionState, MoveApplied, Outcome, OutcomeKind, PlayerId, PlayerIdentity,
    PlayerSlot, Session, SessionId, SessionStatus,
};
