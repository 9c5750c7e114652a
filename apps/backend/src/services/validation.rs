//! Client input validation shared by the websocket and HTTP surfaces.

use serde_json::Value as JsonValue;
use unicode_normalization::UnicodeNormalization;

use crate::domain::leaderboard::{DEFAULT_LIMIT, MAX_LIMIT};
use crate::domain::{Slot, COLS};
use crate::errors::domain::{DomainError, ValidationKind};

pub const USERNAME_MAX_CHARS: usize = 20;

/// Trim and NFKC-normalize; 1..=20 characters after trimming.
pub fn normalize_username(raw: &str) -> Result<String, DomainError> {
    let name: String = raw.trim().nfkc().collect();
    let len = name.chars().count();
    if len == 0 || len > USERNAME_MAX_CHARS {
        return Err(DomainError::validation(
            ValidationKind::Username,
            format!("Username must be 1-{USERNAME_MAX_CHARS} characters"),
        ));
    }
    Ok(name)
}

/// Integer JSON value, or the given validation error.
pub fn integer(value: &JsonValue, kind: ValidationKind, what: &str) -> Result<i64, DomainError> {
    value
        .as_i64()
        .ok_or_else(|| DomainError::validation(kind, format!("Invalid {what}: expected an integer")))
}

pub fn column(column: i64) -> Result<usize, DomainError> {
    usize::try_from(column)
        .ok()
        .filter(|&c| c < COLS)
        .ok_or_else(|| {
            DomainError::validation(
                ValidationKind::Column,
                format!("Invalid column {column}, expected 0-{}", COLS - 1),
            )
        })
}

pub fn slot(slot: i64) -> Result<Slot, DomainError> {
    u8::try_from(slot)
        .map_err(|_| {
            DomainError::validation(
                ValidationKind::Slot,
                format!("Invalid slot {slot}, expected 1 or 2"),
            )
        })
        .and_then(Slot::try_from)
}

/// Missing means the default of 10; otherwise 1..=100.
pub fn limit(limit: Option<i64>) -> Result<u16, DomainError> {
    match limit {
        None => Ok(DEFAULT_LIMIT),
        Some(n) => u16::try_from(n)
            .ok()
            .filter(|n| (1..=MAX_LIMIT).contains(n))
            .ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::Limit,
                    format!("Limit must be between 1 and {MAX_LIMIT}"),
                )
            }),
    }
}
