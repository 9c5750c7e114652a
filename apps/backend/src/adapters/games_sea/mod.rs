//! SeaORM adapter for games and their move log - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::games::{self, GameStatus};
use crate::entities::game_moves;

pub mod dto;

pub use dto::{GameCreate, GameFinish, MoveCreate};

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find_by_id(game_id.to_owned()).one(conn).await
}

pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameCreate,
) -> Result<games::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let game_active = games::ActiveModel {
        id: Set(dto.id),
        player1_id: Set(dto.player1_id),
        player2_id: Set(dto.player2_id),
        winner_id: Set(None),
        status: Set(GameStatus::Playing),
        result: Set(None),
        board_state: Set(dto.board_state),
        started_at: Set(now),
        ended_at: Set(None),
        created_at: Set(now),
    };

    game_active.insert(conn).await
}

/// Move a playing game to finished.
///
/// Returns `false` when the row exists but was already finished, so a
/// repeated finalization does not touch player counters twice.
pub async fn finish_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameFinish,
) -> Result<bool, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let result = games::Entity::update_many()
        .col_expr(games::Column::Status, Expr::value(GameStatus::Finished))
        .col_expr(games::Column::Result, Expr::value(dto.result))
        .col_expr(games::Column::WinnerId, Expr::value(dto.winner_id))
        .col_expr(games::Column::BoardState, Expr::value(dto.board_state))
        .col_expr(games::Column::EndedAt, Expr::value(now))
        .filter(games::Column::Id.eq(dto.id.as_str()))
        .filter(games::Column::Status.eq(GameStatus::Playing))
        .exec(conn)
        .await?;

    if result.rows_affected == 1 {
        return Ok(true);
    }
    match find_by_id(conn, &dto.id).await? {
        Some(_) => Ok(false),
        None => Err(sea_orm::DbErr::RecordNotFound(format!(
            "game {} not found",
            dto.id
        ))),
    }
}

pub async fn record_move<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: MoveCreate,
) -> Result<game_moves::Model, sea_orm::DbErr> {
    let move_active = game_moves::ActiveModel {
        id: NotSet,
        game_id: Set(dto.game_id),
        player_id: Set(dto.player_id),
        column_index: Set(dto.column_index),
        row_index: Set(dto.row_index),
        move_number: Set(dto.move_number),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };

    move_active.insert(conn).await
}

pub async fn moves_for_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
) -> Result<Vec<game_moves::Model>, sea_orm::DbErr> {
    game_moves::Entity::find()
        .filter(game_moves::Column::GameId.eq(game_id))
        .order_by_asc(game_moves::Column::MoveNumber)
        .all(conn)
        .await
}
