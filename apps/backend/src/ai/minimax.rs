//! Hard bot: depth-limited minimax with alpha-beta pruning.

use super::trait_def::{AiError, AiPlayer};
use crate::domain::{Board, Slot};

/// Plies searched below each candidate drop.
pub const SEARCH_DEPTH: u32 = 4;
const WIN_SCORE: i32 = 1000;

#[derive(Debug, Clone, Copy)]
pub struct Minimax {
    depth: u32,
}

impl Default for Minimax {
    fn default() -> Self {
        Self {
            depth: SEARCH_DEPTH,
        }
    }
}

impl Minimax {
    pub const NAME: &'static str = "Minimax";
    pub const VERSION: &'static str = "1.0.0";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_depth(depth: u32) -> Self {
        Self { depth }
    }

    /// Score `board` for `me` with `depth` plies left. `maximizing` is true
    /// when `me` is to move.
    fn search(
        &self,
        board: &Board,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        me: Slot,
    ) -> i32 {
        if let Some(winner) = board.winner() {
            let bonus = depth as i32;
            return if winner == me {
                WIN_SCORE + bonus
            } else {
                -WIN_SCORE - bonus
            };
        }
        if board.is_full() {
            return 0;
        }
        if depth == 0 {
            return board.evaluate(me);
        }

        let mover = if maximizing { me } else { me.other() };
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for col in board.legal_columns() {
            let Some(next) = board.with_disc(col, mover) else {
                continue;
            };
            let score = self.search(&next, depth - 1, alpha, beta, !maximizing, me);
            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }
        best
    }
}

impl AiPlayer for Minimax {
    fn choose_column(&self, board: &Board, me: Slot) -> Result<usize, AiError> {
        let mut best: Option<(usize, i32)> = None;

        for col in board.legal_columns() {
            let Some(next) = board.with_disc(col, me) else {
                continue;
            };
            let score = self.search(&next, self.depth, i32::MIN, i32::MAX, false, me);
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((col, score)),
            }
        }

        best.map(|(col, _)| col).ok_or(AiError::NoMoveAvailable)
    }
}
