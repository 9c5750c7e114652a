//! Per-session turn state machine.
//!
//! A `Session` is plain data plus pure transitions. Locking, timers and
//! event delivery live in the services layer; nothing here performs I/O.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::board::{Board, Slot};
use crate::errors::domain::{DomainError, GameErrorKind};

pub type SessionId = Uuid;
pub type ConnectionId = Uuid;
/// Persistent player id assigned by the store.
pub type PlayerId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerIdentity {
    Human(PlayerId),
    /// Synthetic opponent; has no persistent id.
    Bot,
}

impl PlayerIdentity {
    pub fn player_id(self) -> Option<PlayerId> {
        match self {
            PlayerIdentity::Human(id) => Some(id),
            PlayerIdentity::Bot => None,
        }
    }

    pub fn is_bot(self) -> bool {
        matches!(self, PlayerIdentity::Bot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSlot {
    pub identity: PlayerIdentity,
    pub name: String,
    pub connection_state: ConnectionState,
    /// Transport handle. Only ever passed back to the transport.
    pub connection: Option<ConnectionId>,
    /// Bumped on every disconnect; a reconnect deadline carries the value it
    /// was armed with and is stale once this moves on.
    pub disconnect_epoch: u64,
}

impl PlayerSlot {
    pub fn human(player_id: PlayerId, name: impl Into<String>, connection: ConnectionId) -> Self {
        Self {
            identity: PlayerIdentity::Human(player_id),
            name: name.into(),
            connection_state: ConnectionState::Connected,
            connection: Some(connection),
            disconnect_epoch: 0,
        }
    }

    pub fn bot(name: impl Into<String>) -> Self {
        Self {
            identity: PlayerIdentity::Bot,
            name: name.into(),
            connection_state: ConnectionState::Connected,
            connection: None,
            disconnect_epoch: 0,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection_state == ConnectionState::Connected
    }

    /// Connection to deliver point events to, if a live human sits here.
    pub fn live_connection(&self) -> Option<ConnectionId> {
        if self.is_connected() {
            self.connection
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    Active,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Outcome {
    Win { winner: Slot },
    Draw,
    /// The other slot abandoned the session; `winner` is credited the win.
    Forfeit { winner: Slot },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Win,
    Draw,
    Forfeit,
}

impl OutcomeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeKind::Win => "win",
            OutcomeKind::Draw => "draw",
            OutcomeKind::Forfeit => "forfeit",
        }
    }
}

impl Outcome {
    pub fn kind(self) -> OutcomeKind {
        match self {
            Outcome::Win { .. } => OutcomeKind::Win,
            Outcome::Draw => OutcomeKind::Draw,
            Outcome::Forfeit { .. } => OutcomeKind::Forfeit,
        }
    }

    pub fn winner(self) -> Option<Slot> {
        match self {
            Outcome::Win { winner } | Outcome::Forfeit { winner } => Some(winner),
            Outcome::Draw => None,
        }
    }
}

/// Result of a successful move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveApplied {
    pub slot: Slot,
    pub column: usize,
    pub row: usize,
    /// 1-based, equal to the session's move count after the move.
    pub move_number: u32,
    pub outcome: Option<Outcome>,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    slots: [PlayerSlot; 2],
    board: Board,
    current_slot: Slot,
    status: SessionStatus,
    outcome: Option<Outcome>,
    move_count: u32,
    pub created_at: OffsetDateTime,
    completed_at: Option<OffsetDateTime>,
}

impl Session {
    pub fn new(id: SessionId, first: PlayerSlot, second: PlayerSlot) -> Self {
        Self {
            id,
            slots: [first, second],
            board: Board::new(),
            current_slot: Slot::One,
            status: SessionStatus::Active,
            outcome: None,
            move_count: 0,
            created_at: OffsetDateTime::now_utc(),
            completed_at: None,
        }
    }

    pub fn slot(&self, slot: Slot) -> &PlayerSlot {
        &self.slots[slot.index()]
    }

    pub fn slots(&self) -> impl Iterator<Item = (Slot, &PlayerSlot)> {
        Slot::BOTH.into_iter().map(|s| (s, self.slot(s)))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_slot(&self) -> Slot {
        self.current_slot
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn completed_at(&self) -> Option<OffsetDateTime> {
        self.completed_at
    }

    /// Whether the bot is due to move.
    pub fn is_bot_turn(&self) -> bool {
        self.is_active() && self.slot(self.current_slot).identity.is_bot()
    }

    pub fn has_bot(&self) -> bool {
        self.slots.iter().any(|s| s.identity.is_bot())
    }

    /// Apply `slot`'s disc in `column` and resolve the outcome.
    pub fn apply_move(&mut self, slot: Slot, column: usize) -> Result<MoveApplied, DomainError> {
        if !self.is_active() {
            return Err(DomainError::game(
                GameErrorKind::NotActive,
                "Game is not active",
            ));
        }
        if slot != self.current_slot {
            return Err(DomainError::game(GameErrorKind::NotYourTurn, "Not your turn"));
        }

        let row = self.board.drop_disc(column, slot)?;
        self.move_count += 1;

        let outcome = if let Some(winner) = self.board.winner() {
            Some(Outcome::Win { winner })
        } else if self.board.is_full() {
            Some(Outcome::Draw)
        } else {
            None
        };

        match outcome {
            Some(outcome) => self.finish(outcome),
            None => self.current_slot = slot.other(),
        }

        Ok(MoveApplied {
            slot,
            column,
            row,
            move_number: self.move_count,
            outcome,
        })
    }

    /// End the session with `loser` forfeiting to the other slot.
    pub fn forfeit(&mut self, loser: Slot) -> Result<Outcome, DomainError> {
        if !self.is_active() {
            return Err(DomainError::game(
                GameErrorKind::NotActive,
                "Game is not active",
            ));
        }
        let outcome = Outcome::Forfeit {
            winner: loser.other(),
        };
        self.finish(outcome);
        Ok(outcome)
    }

    fn finish(&mut self, outcome: Outcome) {
        self.status = SessionStatus::Finished;
        self.outcome = Some(outcome);
        self.completed_at = Some(OffsetDateTime::now_utc());
    }

    /// Record a dropped connection; returns the new disconnect epoch.
    pub fn mark_disconnected(&mut self, slot: Slot) -> u64 {
        let seat = &mut self.slots[slot.index()];
        seat.connection_state = ConnectionState::Disconnected;
        seat.disconnect_epoch += 1;
        seat.disconnect_epoch
    }

    /// Rebind `slot` to `connection`; returns the connection it replaced.
    pub fn mark_connected(&mut self, slot: Slot, connection: ConnectionId) -> Option<ConnectionId> {
        let seat = &mut self.slots[slot.index()];
        seat.connection_state = ConnectionState::Connected;
        seat.connection.replace(connection)
    }

    /// Which slot `connection` currently occupies, if any.
    pub fn slot_of(&self, connection: ConnectionId) -> Option<Slot> {
        self.slots()
            .find(|(_, seat)| seat.connection == Some(connection))
            .map(|(slot, _)| slot)
    }
}
