//! SeaORM adapter for player rows - generic over ConnectionTrait.

use sea_orm::sea_query::{Expr, OnConflict, Order};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::players;

// Adapter functions return DbErr; the store maps to DomainError via From<DbErr>.

/// Per-game effect on a player's aggregate counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerResult {
    Win,
    Loss,
    Draw,
}

impl PlayerResult {
    fn column(self) -> players::Column {
        match self {
            PlayerResult::Win => players::Column::TotalWins,
            PlayerResult::Loss => players::Column::TotalLosses,
            PlayerResult::Draw => players::Column::TotalDraws,
        }
    }
}

pub async fn find_by_username<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find()
        .filter(players::Column::Username.eq(username))
        .one(conn)
        .await
}

/// Insert the player unless the username exists, then load the row.
pub async fn ensure_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<players::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let player_active = players::ActiveModel {
        id: NotSet,
        username: Set(username.to_owned()),
        total_games: Set(0),
        total_wins: Set(0),
        total_losses: Set(0),
        total_draws: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };

    players::Entity::insert(player_active)
        .on_conflict(
            OnConflict::column(players::Column::Username)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    find_by_username(conn, username)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("players.username not found".to_string()))
}

/// Bump `total_games` and the counter matching `result`.
pub async fn apply_result<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    result: PlayerResult,
) -> Result<(), sea_orm::DbErr> {
    let counter = result.column();
    let res = players::Entity::update_many()
        .col_expr(
            players::Column::TotalGames,
            Expr::col(players::Column::TotalGames).add(1),
        )
        .col_expr(counter, Expr::col(counter).add(1))
        .col_expr(
            players::Column::UpdatedAt,
            Expr::value(time::OffsetDateTime::now_utc()),
        )
        .filter(players::Column::Id.eq(player_id))
        .exec(conn)
        .await?;

    if res.rows_affected == 0 {
        return Err(sea_orm::DbErr::RecordNotFound(format!(
            "player {player_id} not found"
        )));
    }
    Ok(())
}

/// Players with at least one game, most wins first, then best win ratio.
pub async fn top_players<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    limit: u64,
) -> Result<Vec<players::Model>, sea_orm::DbErr> {
    players::Entity::find()
        .filter(players::Column::TotalGames.gt(0))
        .order_by_desc(players::Column::TotalWins)
        .order_by(
            Expr::cust("CAST(total_wins AS REAL) / total_games"),
            Order::Desc,
        )
        .order_by_asc(players::Column::Username)
        .limit(limit)
        .all(conn)
        .await
}
