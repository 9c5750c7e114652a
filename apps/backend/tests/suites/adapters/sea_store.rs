use backend::adapters::games_sea;
use backend::domain::{Board, OutcomeKind, Slot};
use backend::entities::games::{GameResult, GameStatus};
use backend::services::gateways::PersistenceGateway;
use backend::SeaStore;
use uuid::Uuid;

use crate::support::db::sqlite_db;

async fn store() -> SeaStore {
    SeaStore::new(sqlite_db().await)
}

fn winning_board() -> Board {
    Board::from_rows([
        ".......",
        ".......",
        "1......",
        "12.....",
        "12.....",
        "12.....",
    ])
    .expect("valid rows")
}

#[tokio::test]
async fn human_game_updates_both_players() {
    let store = store().await;
    let alice = store.find_or_create_player("alice").await.unwrap();
    let bob = store.find_or_create_player("bob").await.unwrap();
    assert_eq!(store.find_or_create_player("alice").await.unwrap(), alice);

    let id = Uuid::new_v4();
    store.create_game(id, alice, Some(bob), &Board::new()).await.unwrap();
    store.record_move(id, alice, 0, 5, 1).await.unwrap();
    store.record_move(id, bob, 1, 5, 2).await.unwrap();
    store
        .finalize_game(id, Some(alice), OutcomeKind::Win, &winning_board())
        .await
        .unwrap();

    let board = store.leaderboard(10).await.unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].username, "alice");
    assert_eq!((board[0].total_games, board[0].total_wins), (1, 1));
    assert_eq!(board[0].win_rate, 100.0);
    assert_eq!((board[1].username.as_str(), board[1].total_losses), ("bob", 1));

    let game = games_sea::find_by_id(store.connection(), &id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(game.status, GameStatus::Finished);
    assert_eq!(game.result, Some(GameResult::Win));
    assert_eq!(game.winner_id, Some(alice));

    let stored: Board = serde_json::from_str(&game.board_state).unwrap();
    assert_eq!(stored, winning_board());
    assert_eq!(stored.winner(), Some(Slot::One));

    let moves = games_sea::moves_for_game(store.connection(), &id.to_string())
        .await
        .unwrap();
    assert_eq!(moves.len(), 2);
}

#[tokio::test]
async fn bot_win_is_a_loss_for_the_human() {
    let store = store().await;
    let solo = store.find_or_create_player("solo").await.unwrap();
    let id = Uuid::new_v4();
    store.create_game(id, solo, None, &Board::new()).await.unwrap();
    store
        .finalize_game(id, None, OutcomeKind::Win, &Board::new())
        .await
        .unwrap();

    let board = store.leaderboard(10).await.unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!((board[0].total_games, board[0].total_losses, board[0].total_wins), (1, 1, 0));

    let game = games_sea::find_by_id(store.connection(), &id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(game.player2_id, None);
    assert_eq!(game.winner_id, None);
}

#[tokio::test]
async fn draw_and_forfeit_results() {
    let store = store().await;
    let a = store.find_or_create_player("a").await.unwrap();
    let b = store.find_or_create_player("b").await.unwrap();

    let drawn = Uuid::new_v4();
    store.create_game(drawn, a, Some(b), &Board::new()).await.unwrap();
    store
        .finalize_game(drawn, None, OutcomeKind::Draw, &Board::new())
        .await
        .unwrap();

    let forfeited = Uuid::new_v4();
    store.create_game(forfeited, a, Some(b), &Board::new()).await.unwrap();
    store
        .finalize_game(forfeited, Some(b), OutcomeKind::Forfeit, &Board::new())
        .await
        .unwrap();

    let rows = store.leaderboard(10).await.unwrap();
    let row = |name: &str| rows.iter().find(|r| r.username == name).unwrap().clone();
    let (ra, rb) = (row("a"), row("b"));
    assert_eq!((ra.total_games, ra.total_draws, ra.total_losses), (2, 1, 1));
    assert_eq!((rb.total_games, rb.total_draws, rb.total_wins), (2, 1, 1));
    assert_eq!(rows[0].username, "b");

    let game = games_sea::find_by_id(store.connection(), &forfeited.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(game.result, Some(GameResult::Forfeit));
}

#[tokio::test]
async fn finalizing_twice_counts_once() {
    let store = store().await;
    let a = store.find_or_create_player("a").await.unwrap();
    let b = store.find_or_create_player("b").await.unwrap();
    let id = Uuid::new_v4();
    store.create_game(id, a, Some(b), &Board::new()).await.unwrap();

    for _ in 0..2 {
        store
            .finalize_game(id, Some(a), OutcomeKind::Win, &Board::new())
            .await
            .unwrap();
    }
    let rows = store.leaderboard(10).await.unwrap();
    assert!(rows.iter().all(|r| r.total_games == 1));
}

#[tokio::test]
async fn finalizing_an_unknown_game_changes_nothing() {
    let store = store().await;
    let a = store.find_or_create_player("a").await.unwrap();
    let id = Uuid::new_v4();
    store.create_game(id, a, None, &Board::new()).await.unwrap();

    let err = store
        .finalize_game(Uuid::new_v4(), Some(a), OutcomeKind::Win, &Board::new())
        .await
        .unwrap_err();
    assert_eq!(err.code().as_str(), "DB_ERROR");
    assert!(store.leaderboard(10).await.unwrap().is_empty());

    let game = games_sea::find_by_id(store.connection(), &id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(game.status, GameStatus::Playing);
}

#[tokio::test]
async fn moves_for_unknown_games_violate_the_foreign_key() {
    let store = store().await;
    let a = store.find_or_create_player("a").await.unwrap();
    let err = store
        .record_move(Uuid::new_v4(), a, 0, 5, 1)
        .await
        .unwrap_err();
    assert_eq!(err.code().as_str(), "DB_ERROR", "got {err:?}");
}

#[tokio::test]
async fn reports_its_backend() {
    let store = store().await;
    assert_eq!(store.backend_name(), "sqlite");
    assert!(store.leaderboard(10).await.unwrap().is_empty());
}
