use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::LeaderboardEntry;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
struct LeaderboardQuery {
    limit: Option<String>,
}

#[derive(Debug, Serialize)]
struct LeaderboardResponse {
    success: bool,
    data: Vec<LeaderboardEntry>,
    count: usize,
}

/// `limit` arrives as text so a non-numeric value is reported as
/// INVALID_LIMIT rather than a generic query parse failure.
fn parse_limit(raw: Option<&str>) -> Result<Option<i64>, AppError> {
    raw.map(|s| {
        s.trim().parse::<i64>().map_err(|_| {
            AppError::invalid(ErrorCode::InvalidLimit, format!("Invalid limit '{s}'"))
        })
    })
    .transpose()
}

async fn leaderboard(
    query: web::Query<LeaderboardQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let limit = parse_limit(query.limit.as_deref())?;
    let data = app_state.game_flow().leaderboard(limit).await?;
    let count = data.len();
    Ok(HttpResponse::Ok().json(LeaderboardResponse {
        success: true,
        data,
        count,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/leaderboard", web::get().to(leaderboard));
}
