//! Easy bot: mostly random, occasionally tactical.

use parking_lot::Mutex;
use rand::prelude::*;

use super::tactical::Tactical;
use super::trait_def::{AiError, AiPlayer};
use crate::domain::{Board, Slot};

/// Chance of playing the medium strategy instead of a random column.
pub const TACTICAL_PROBABILITY: f64 = 0.3;

/// Seedable so tests can pin its choices.
pub struct Casual {
    rng: Mutex<StdRng>,
}

impl Casual {
    pub const NAME: &'static str = "Casual";
    pub const VERSION: &'static str = "1.0.0";

    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl AiPlayer for Casual {
    fn choose_column(&self, board: &Board, me: Slot) -> Result<usize, AiError> {
        let legal = board.legal_columns();
        let mut rng = self.rng.lock();

        if rng.random_bool(TACTICAL_PROBABILITY) {
            return Tactical::pick(board, me);
        }

        legal
            .choose(&mut *rng)
            .copied()
            .ok_or(AiError::NoMoveAvailable)
    }
}
