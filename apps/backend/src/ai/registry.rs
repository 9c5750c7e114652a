//! Static table of bot implementations, one per difficulty.
//!
//! To add a bot: implement `AiPlayer`, then add an `AiFactory` row with a
//! stable `name` and `version`. Constructors must be side-effect free and
//! the same seed must give the same behavior where a bot is random.

use super::casual::Casual;
use super::minimax::Minimax;
use super::tactical::Tactical;
use super::{AiPlayer, Difficulty};

pub struct AiFactory {
    pub difficulty: Difficulty,
    pub name: &'static str,
    pub version: &'static str,
    pub make: fn(seed: Option<u64>) -> Box<dyn AiPlayer>,
}

static AI_FACTORIES: &[AiFactory] = &[
    AiFactory {
        difficulty: Difficulty::Easy,
        name: Casual::NAME,
        version: Casual::VERSION,
        make: make_casual,
    },
    AiFactory {
        difficulty: Difficulty::Medium,
        name: Tactical::NAME,
        version: Tactical::VERSION,
        make: make_tactical,
    },
    AiFactory {
        difficulty: Difficulty::Hard,
        name: Minimax::NAME,
        version: Minimax::VERSION,
        make: make_minimax,
    },
];

pub fn registered_ais() -> &'static [AiFactory] {
    AI_FACTORIES
}

pub fn by_difficulty(difficulty: Difficulty) -> &'static AiFactory {
    // Every Difficulty has a row; the table test guards this.
    match registered_ais().iter().find(|f| f.difficulty == difficulty) {
        Some(factory) => factory,
        None => &AI_FACTORIES[1],
    }
}

fn make_casual(seed: Option<u64>) -> Box<dyn AiPlayer> {
    Box::new(Casual::new(seed))
}

fn make_tactical(_seed: Option<u64>) -> Box<dyn AiPlayer> {
    Box::new(Tactical::new())
}

fn make_minimax(_seed: Option<u64>) -> Box<dyn AiPlayer> {
    Box::new(Minimax::new())
}
