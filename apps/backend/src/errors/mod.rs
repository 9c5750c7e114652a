//! Error handling for the game server.

pub mod domain;
pub mod error_code;

pub use domain::{DomainError, GameErrorKind, PersistenceKind, ValidationKind};
pub use error_code::ErrorCode;
