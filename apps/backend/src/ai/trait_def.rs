//! Bot player trait definition.

use std::fmt;

use crate::domain::{Board, Slot};
use crate::errors::domain::DomainError;

/// Errors that can occur while a bot picks a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiError {
    /// Every column is full
    NoMoveAvailable,
    /// The bot hit an internal fault (poisoned lock, etc.)
    Internal(String),
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::NoMoveAvailable => write!(f, "bot has no legal move"),
            AiError::Internal(msg) => write!(f, "bot internal error: {msg}"),
        }
    }
}

impl std::error::Error for AiError {}

impl From<AiError> for DomainError {
    fn from(err: AiError) -> Self {
        DomainError::infra(format!("AI error: {err}"))
    }
}

/// A synthetic opponent.
///
/// Implementations receive a copy of the grid and the slot they play, and
/// must return a legal column. They run on a blocking thread with no session
/// lock held, so they may take their time.
pub trait AiPlayer: Send + Sync {
    fn choose_column(&self, board: &Board, me: Slot) -> Result<usize, AiError>;
}
