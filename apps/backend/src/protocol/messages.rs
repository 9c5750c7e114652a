use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::{Board, LeaderboardEntry, Outcome, SessionId, SessionStatus, Slot};
use crate::errors::{DomainError, ErrorCode};

/// Inbound frames, tagged by `type`.
///
/// `column` and `slot` stay loosely typed so out-of-range or non-integer
/// input is reported as a validation error instead of a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMsg {
    JoinGame {
        #[serde(default)]
        username: String,
    },
    /// Same as `JoinGame`; sent by clients after a finished game.
    NewGame {
        #[serde(default)]
        username: String,
    },
    MakeMove {
        #[serde(default)]
        column: JsonValue,
    },
    #[serde(rename_all = "camelCase")]
    ReconnectGame { session_id: SessionId, slot: JsonValue },
    GetLeaderboard {
        #[serde(default)]
        limit: Option<JsonValue>,
    },
}

/// Outbound events.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMsg {
    #[serde(rename_all = "camelCase")]
    GameFound {
        session_id: SessionId,
        opponent_name: String,
        opponent_is_bot: bool,
        assigned_slot: Slot,
        grid: Board,
        current_slot: Slot,
    },
    #[serde(rename_all = "camelCase")]
    MoveMade {
        grid: Board,
        current_slot: Slot,
        column: usize,
        row: usize,
    },
    GameOver { outcome: Outcome, grid: Board },
    OpponentDisconnected,
    OpponentReconnected,
    #[serde(rename_all = "camelCase")]
    GameUpdate {
        session_id: SessionId,
        grid: Board,
        current_slot: Slot,
        status: SessionStatus,
        outcome: Option<Outcome>,
    },
    LeaderboardData { leaderboard: Vec<LeaderboardEntry> },
    Error { message: String, code: ErrorCode },
}

impl ServerMsg {
    pub fn error(err: &DomainError) -> Self {
        ServerMsg::Error {
            message: err.message().to_string(),
            code: err.code(),
        }
    }

    /// Value of the `type` tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMsg::GameFound { .. } => "gameFound",
            ServerMsg::MoveMade { .. } => "moveMade",
            ServerMsg::GameOver { .. } => "gameOver",
            ServerMsg::OpponentDisconnected => "opponentDisconnected",
            ServerMsg::OpponentReconnected => "opponentReconnected",
            ServerMsg::GameUpdate { .. } => "gameUpdate",
            ServerMsg::LeaderboardData { .. } => "leaderboardData",
            ServerMsg::Error { .. } => "error",
        }
    }
}
