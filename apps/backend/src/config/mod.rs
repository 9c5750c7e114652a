//! Environment-driven configuration.
//!
//! Each `from_env` has a `from_lookup` twin that takes the variable source as
//! a closure so parsing can be tested without touching process env.

pub mod db;
pub mod game;
pub mod server;

pub use db::{StoreConfig, StoreKind};
pub use game::GameConfig;
pub use server::ServerConfig;

use std::str::FromStr;

use crate::error::AppError;

/// Parse `name` from `lookup`, falling back to `default` when unset.
pub(crate) fn parse_var<T, F>(lookup: &F, name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("invalid value for {name} ('{raw}'): {e}"))),
    }
}

pub(crate) fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
