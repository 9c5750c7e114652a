//! Synthetic opponents.
//!
//! Three tiers, all behind [`AiPlayer`]:
//! - easy ([`Casual`]): random legal column, sometimes tactical
//! - medium ([`Tactical`]): win, block, then closest to center
//! - hard ([`Minimax`]): alpha-beta search four plies deep

mod casual;
mod minimax;
pub mod registry;
mod tactical;
mod trait_def;

use std::fmt;
use std::str::FromStr;

pub use casual::Casual;
pub use minimax::{Minimax, SEARCH_DEPTH};
pub use tactical::Tactical;
pub use trait_def::{AiError, AiPlayer};

use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(DomainError::validation(
                ValidationKind::Other("difficulty".into()),
                format!("unknown bot difficulty '{other}'"),
            )),
        }
    }
}

/// Build the bot for `difficulty`. `seed` pins the random tier.
pub fn create_ai(difficulty: Difficulty, seed: Option<u64>) -> Box<dyn AiPlayer> {
    (registry::by_difficulty(difficulty).make)(seed)
}
