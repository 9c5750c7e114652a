//! Leaderboard rows and ranking.

use std::cmp::Ordering;

use serde::Serialize;

pub const DEFAULT_LIMIT: u16 = 10;
pub const MAX_LIMIT: u16 = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub username: String,
    pub total_games: i32,
    pub total_wins: i32,
    pub total_losses: i32,
    pub total_draws: i32,
    /// Percentage of games won, rounded to two decimals.
    pub win_rate: f64,
}

impl LeaderboardEntry {
    pub fn new(
        username: impl Into<String>,
        total_games: i32,
        total_wins: i32,
        total_losses: i32,
        total_draws: i32,
    ) -> Self {
        Self {
            username: username.into(),
            total_games,
            total_wins,
            total_losses,
            total_draws,
            win_rate: win_rate(total_wins, total_games),
        }
    }
}

pub fn win_rate(wins: i32, games: i32) -> f64 {
    if games <= 0 {
        return 0.0;
    }
    let pct = f64::from(wins) * 100.0 / f64::from(games);
    (pct * 100.0).round() / 100.0
}

/// Wins descending, then win rate descending.
pub fn rank_order(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.total_wins
        .cmp(&a.total_wins)
        .then_with(|| b.win_rate.total_cmp(&a.win_rate))
}
