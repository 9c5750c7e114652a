//! DTOs for games_sea adapter.

use crate::entities::games::GameResult;

/// New game row at session start.
#[derive(Debug, Clone)]
pub struct GameCreate {
    pub id: String,
    pub player1_id: i64,
    pub player2_id: Option<i64>,
    pub board_state: String,
}

/// Closing write for a finished game.
#[derive(Debug, Clone)]
pub struct GameFinish {
    pub id: String,
    pub winner_id: Option<i64>,
    pub result: GameResult,
    pub board_state: String,
}

#[derive(Debug, Clone)]
pub struct MoveCreate {
    pub game_id: String,
    pub player_id: i64,
    pub column_index: i16,
    pub row_index: i16,
    pub move_number: i32,
}
