//! Domain-level error type used across the game core, services and adapters.
//!
//! This error type is transport- and DB-agnostic. The websocket layer turns
//! it into an `error` frame, HTTP handlers convert it into `AppError` through
//! the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::ErrorCode;

/// Which piece of client input failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    Username,
    Column,
    Slot,
    Limit,
    Malformed,
    Other(String),
}

/// Rule violations raised by the board, sessions and matchmaking.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameErrorKind {
    NotYourTurn,
    ColumnFull,
    ColumnOutOfRange,
    NotActive,
    SessionNotFound,
    NotInGame,
    AlreadyQueued,
    AlreadyInGame,
    BotSlot,
}

/// Persistence failures reported by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PersistenceKind {
    Unavailable,
    Query,
    NotFound,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Client input could not be accepted
    Validation(ValidationKind, String),
    /// Game rule violation
    Game(GameErrorKind, String),
    /// Store failure
    Persistence(PersistenceKind, String),
    /// Anything else operational (task join failures, bot errors)
    Infra(String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::Game(kind, d) => write!(f, "game error {kind:?}: {d}"),
            DomainError::Persistence(kind, d) => write!(f, "persistence {kind:?}: {d}"),
            DomainError::Infra(d) => write!(f, "infra: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn game(kind: GameErrorKind, detail: impl Into<String>) -> Self {
        Self::Game(kind, detail.into())
    }
    pub fn persistence(kind: PersistenceKind, detail: impl Into<String>) -> Self {
        Self::Persistence(kind, detail.into())
    }
    pub fn infra(detail: impl Into<String>) -> Self {
        Self::Infra(detail.into())
    }

    /// Human readable message sent to clients.
    pub fn message(&self) -> &str {
        match self {
            DomainError::Validation(_, d)
            | DomainError::Game(_, d)
            | DomainError::Persistence(_, d)
            | DomainError::Infra(d) => d,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::Username => ErrorCode::InvalidUsername,
                ValidationKind::Column => ErrorCode::InvalidColumn,
                ValidationKind::Slot => ErrorCode::InvalidSlot,
                ValidationKind::Limit => ErrorCode::InvalidLimit,
                ValidationKind::Malformed => ErrorCode::BadRequest,
                ValidationKind::Other(_) => ErrorCode::ValidationError,
            },
            DomainError::Game(kind, _) => match kind {
                GameErrorKind::NotYourTurn => ErrorCode::NotYourTurn,
                GameErrorKind::ColumnFull => ErrorCode::ColumnFull,
                GameErrorKind::ColumnOutOfRange => ErrorCode::InvalidColumn,
                GameErrorKind::NotActive => ErrorCode::GameNotActive,
                GameErrorKind::SessionNotFound => ErrorCode::GameNotFound,
                GameErrorKind::NotInGame => ErrorCode::NotInGame,
                GameErrorKind::AlreadyQueued => ErrorCode::AlreadyQueued,
                GameErrorKind::AlreadyInGame => ErrorCode::AlreadyInGame,
                GameErrorKind::BotSlot => ErrorCode::BotSlot,
            },
            DomainError::Persistence(kind, _) => match kind {
                PersistenceKind::Unavailable => ErrorCode::DbUnavailable,
                PersistenceKind::Query | PersistenceKind::NotFound => ErrorCode::DbError,
            },
            DomainError::Infra(_) => ErrorCode::Internal,
        }
    }

    /// Caller mistakes are logged at warn, everything else at error.
    pub fn is_client_error(&self) -> bool {
        matches!(self, DomainError::Validation(..) | DomainError::Game(..))
    }

    /// Whether retrying the same store call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DomainError::Persistence(PersistenceKind::Unavailable | PersistenceKind::Query, _)
        )
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        use sea_orm::DbErr;
        match e {
            DbErr::ConnectionAcquire(err) => {
                DomainError::persistence(PersistenceKind::Unavailable, err.to_string())
            }
            DbErr::Conn(err) => DomainError::persistence(PersistenceKind::Unavailable, err.to_string()),
            DbErr::RecordNotFound(what) => DomainError::persistence(PersistenceKind::NotFound, what),
            other => DomainError::persistence(PersistenceKind::Query, other.to_string()),
        }
    }
}
