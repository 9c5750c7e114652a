use std::time::Duration;

use super::{env_lookup, parse_var};
use crate::ai::Difficulty;
use crate::error::AppError;

/// Timings and bot settings for the game core.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// How long a disconnected slot has to come back before forfeiting.
    pub reconnect_timeout: Duration,
    /// Pause before the bot answers a move.
    pub bot_move_delay: Duration,
    /// How long a player waits in the queue before getting the bot.
    pub matchmaking_timeout: Duration,
    pub bot_difficulty: Difficulty,
    pub bot_name: String,
    /// Seed for the random bot tier; `None` draws from the OS.
    pub bot_seed: Option<u64>,
    /// Finished sessions older than this are swept.
    pub finished_session_ttl: Duration,
    pub sweep_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            reconnect_timeout: Duration::from_millis(30_000),
            bot_move_delay: Duration::from_millis(1_000),
            matchmaking_timeout: Duration::from_millis(10_000),
            bot_difficulty: Difficulty::Medium,
            bot_name: "Bot".to_string(),
            bot_seed: None,
            finished_session_ttl: Duration::from_secs(3_600),
            sweep_interval: Duration::from_secs(1_800),
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let millis = |name: &str, default: Duration| -> Result<Duration, AppError> {
            parse_var(&lookup, name, default.as_millis() as u64).map(Duration::from_millis)
        };
        // A zero sweep period would make the interval timer panic.
        let nonzero_secs = |name: &str, default: Duration| -> Result<Duration, AppError> {
            match parse_var(&lookup, name, default.as_secs())? {
                0 => Err(AppError::config(format!("{name} must be at least 1"))),
                n => Ok(Duration::from_secs(n)),
            }
        };

        let bot_difficulty = match lookup("BOT_DIFFICULTY") {
            Some(raw) if !raw.trim().is_empty() => raw
                .parse::<Difficulty>()
                .map_err(|e| AppError::config(e.message().to_string()))?,
            _ => d.bot_difficulty,
        };
        let bot_name = lookup("BOT_NAME")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(d.bot_name);
        let bot_seed = match lookup("BOT_SEED") {
            Some(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse()
                    .map_err(|e| AppError::config(format!("invalid value for BOT_SEED: {e}")))?,
            ),
            _ => None,
        };

        Ok(Self {
            reconnect_timeout: millis("RECONNECT_TIMEOUT_MS", d.reconnect_timeout)?,
            bot_move_delay: millis("BOT_MOVE_DELAY_MS", d.bot_move_delay)?,
            matchmaking_timeout: millis("MATCHMAKING_TIMEOUT_MS", d.matchmaking_timeout)?,
            bot_difficulty,
            bot_name,
            bot_seed,
            finished_session_ttl: nonzero_secs(
                "FINISHED_SESSION_TTL_SECS",
                d.finished_session_ttl,
            )?,
            sweep_interval: nonzero_secs("SESSION_SWEEP_INTERVAL_SECS", d.sweep_interval)?,
        })
    }
}
