use std::sync::Arc;

use actix_web::test;
use backend::adapters::MemoryStore;
use backend::domain::{Board, OutcomeKind};
use backend::services::gateways::PersistenceGateway;
use serde_json::Value;
use uuid::Uuid;

use crate::common::assert_problem_details;
use crate::support::app::{create_test_app, memory_state};

/// Record a finished game between `winner` and `loser`.
async fn seed_win(store: &MemoryStore, winner: &str, loser: &str) {
    let w = store.find_or_create_player(winner).await.unwrap();
    let l = store.find_or_create_player(loser).await.unwrap();
    let id = Uuid::new_v4();
    store.create_game(id, w, Some(l), &Board::new()).await.unwrap();
    store
        .finalize_game(id, Some(w), OutcomeKind::Win, &Board::new())
        .await
        .unwrap();
}

#[actix_web::test]
async fn returns_ranked_rows() {
    let store = Arc::new(MemoryStore::new());
    seed_win(&store, "alice", "bob").await;
    seed_win(&store, "alice", "carol").await;
    seed_win(&store, "carol", "bob").await;
    let app = create_test_app(memory_state(store).await).await;

    let req = test::TestRequest::get()
        .uri("/api/players/leaderboard")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 3);

    let rows = body["data"].as_array().unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r["username"].as_str().unwrap()).collect();
    assert_eq!(names, ["alice", "carol", "bob"]);
    assert_eq!(rows[0]["totalWins"], 2);
    assert_eq!(rows[0]["winRate"], 100.0);
    assert_eq!(rows[1]["winRate"], 50.0);
    assert_eq!(rows[2]["totalLosses"], 2);

    let req = test::TestRequest::get()
        .uri("/api/players/leaderboard?limit=1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["username"], "alice");
}

#[actix_web::test]
async fn empty_leaderboard() {
    let app = create_test_app(memory_state(Arc::new(MemoryStore::new())).await).await;
    let req = test::TestRequest::get()
        .uri("/api/players/leaderboard")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["data"], serde_json::json!([]));
}

#[actix_web::test]
async fn invalid_limits_are_problem_details() {
    let app = create_test_app(memory_state(Arc::new(MemoryStore::new())).await).await;

    for limit in ["0", "101", "-3", "ten"] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/players/leaderboard?limit={limit}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let problem = assert_problem_details(resp, 400, "INVALID_LIMIT").await;
        assert!(problem["type"]
            .as_str()
            .is_some_and(|t| t.ends_with("invalid_limit")));
    }
}
