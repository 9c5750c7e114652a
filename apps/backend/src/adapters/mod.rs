//! Persistence gateway implementations.

pub mod games_sea;
pub mod memory_store;
pub mod players_sea;
pub mod sea_store;

pub use memory_store::MemoryStore;
pub use sea_store::SeaStore;

use crate::domain::{OutcomeKind, PlayerId};
use players_sea::PlayerResult;

/// Counter updates for the human participants of a finished game.
///
/// `winner` is `None` for draws and for games the bot won, in which case
/// every human participant is credited a loss.
pub(crate) fn settle(
    participants: impl IntoIterator<Item = PlayerId>,
    winner: Option<PlayerId>,
    outcome: OutcomeKind,
) -> Vec<(PlayerId, PlayerResult)> {
    participants
        .into_iter()
        .map(|id| {
            let result = match outcome {
                OutcomeKind::Draw => PlayerResult::Draw,
                OutcomeKind::Win | OutcomeKind::Forfeit if winner == Some(id) => PlayerResult::Win,
                OutcomeKind::Win | OutcomeKind::Forfeit => PlayerResult::Loss,
            };
            (id, result)
        })
        .collect()
}
