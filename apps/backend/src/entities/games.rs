use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Lifecycle of an audited game row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum GameStatus {
    #[sea_orm(string_value = "playing")]
    Playing,
    #[sea_orm(string_value = "finished")]
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum GameResult {
    #[sea_orm(string_value = "win")]
    Win,
    #[sea_orm(string_value = "draw")]
    Draw,
    #[sea_orm(string_value = "forfeit")]
    Forfeit,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    /// Session uuid in hyphenated form.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_name = "player1_id")]
    pub player1_id: i64,
    #[sea_orm(column_name = "player2_id")]
    pub player2_id: Option<i64>,
    #[sea_orm(column_name = "winner_id")]
    pub winner_id: Option<i64>,
    pub status: GameStatus,
    pub result: Option<GameResult>,
    /// JSON grid snapshot, rows top to bottom.
    #[sea_orm(column_name = "board_state", column_type = "Text")]
    pub board_state: String,
    #[sea_orm(column_name = "started_at")]
    pub started_at: OffsetDateTime,
    #[sea_orm(column_name = "ended_at")]
    pub ended_at: Option<OffsetDateTime>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::players::Entity",
        from = "Column::Player1Id",
        to = "super::players::Column::Id"
    )]
    Player1,
    #[sea_orm(
        belongs_to = "super::players::Entity",
        from = "Column::Player2Id",
        to = "super::players::Column::Id"
    )]
    Player2,
    #[sea_orm(has_many = "super::game_moves::Entity")]
    GameMoves,
}

impl Related<super::game_moves::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameMoves.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
