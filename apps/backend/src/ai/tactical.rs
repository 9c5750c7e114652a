//! Medium bot: take a win, block a loss, otherwise hug the center.

use super::trait_def::{AiError, AiPlayer};
use crate::domain::{Board, Slot, CENTER_COLUMN};

#[derive(Debug, Default, Clone, Copy)]
pub struct Tactical;

impl Tactical {
    pub const NAME: &'static str = "Tactical";
    pub const VERSION: &'static str = "1.0.0";

    pub fn new() -> Self {
        Self
    }

    /// First legal column in which `slot` completes a line.
    fn winning_column(board: &Board, legal: &[usize], slot: Slot) -> Option<usize> {
        legal.iter().copied().find(|&col| {
            board
                .with_disc(col, slot)
                .is_some_and(|next| next.winner() == Some(slot))
        })
    }

    pub(super) fn pick(board: &Board, me: Slot) -> Result<usize, AiError> {
        let legal = board.legal_columns();
        if legal.is_empty() {
            return Err(AiError::NoMoveAvailable);
        }

        if let Some(col) = Self::winning_column(board, &legal, me) {
            return Ok(col);
        }
        if let Some(col) = Self::winning_column(board, &legal, me.other()) {
            return Ok(col);
        }
        if legal.contains(&CENTER_COLUMN) {
            return Ok(CENTER_COLUMN);
        }

        // min_by_key keeps the first minimum, so ties go to the lower index.
        legal
            .iter()
            .copied()
            .min_by_key(|&col| col.abs_diff(CENTER_COLUMN))
            .ok_or(AiError::NoMoveAvailable)
    }
}

impl AiPlayer for Tactical {
    fn choose_column(&self, board: &Board, me: Slot) -> Result<usize, AiError> {
        Self::pick(board, me)
    }
}
