//! Error codes surfaced to clients.
//!
//! Every failure that reaches a websocket `error` frame or an HTTP problem
//! response carries one of these codes. Add new codes here; never pass
//! ad-hoc strings as error codes.

use core::fmt;

use serde::{Serialize, Serializer};

/// Centralized error codes for the game server.
///
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request validation
    /// Username empty or longer than the allowed maximum
    InvalidUsername,
    /// Column outside 0..=6 or not an integer
    InvalidColumn,
    /// Slot number other than 1 or 2
    InvalidSlot,
    /// Leaderboard limit outside 1..=100
    InvalidLimit,
    /// General validation error
    ValidationError,
    /// Frame or request body could not be parsed
    BadRequest,

    // Game rules
    NotYourTurn,
    ColumnFull,
    GameNotActive,
    GameNotFound,
    /// Connection is not bound to any session
    NotInGame,
    AlreadyQueued,
    AlreadyInGame,
    /// Reconnect targeted the bot's slot
    BotSlot,

    // System errors
    DbError,
    DbUnavailable,
    ConfigError,
    Internal,
}

impl ErrorCode {
    /// Get the canonical string representation of this error code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidColumn => "INVALID_COLUMN",
            Self::InvalidSlot => "INVALID_SLOT",
            Self::InvalidLimit => "INVALID_LIMIT",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::ColumnFull => "COLUMN_FULL",
            Self::GameNotActive => "GAME_NOT_ACTIVE",
            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::NotInGame => "NOT_IN_GAME",
            Self::AlreadyQueued => "ALREADY_QUEUED",
            Self::AlreadyInGame => "ALREADY_IN_GAME",
            Self::BotSlot => "BOT_SLOT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::ConfigError => "CONFIG_ERROR",
            Self::Internal => "INTERNAL",
        }
    }

    pub const ALL: [ErrorCode; 18] = [
        Self::InvalidUsername,
        Self::InvalidColumn,
        Self::InvalidSlot,
        Self::InvalidLimit,
        Self::ValidationError,
        Self::BadRequest,
        Self::NotYourTurn,
        Self::ColumnFull,
        Self::GameNotActive,
        Self::GameNotFound,
        Self::NotInGame,
        Self::AlreadyQueued,
        Self::AlreadyInGame,
        Self::BotSlot,
        Self::DbError,
        Self::DbUnavailable,
        Self::ConfigError,
        Self::Internal,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
