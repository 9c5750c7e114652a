use std::sync::Arc;

use actix_web::test;
use backend::adapters::MemoryStore;
use serde_json::Value;

use crate::support::app::{create_test_app, memory_state};

#[actix_web::test]
async fn health_reports_store_and_counts() {
    let state = memory_state(Arc::new(MemoryStore::new())).await;
    let app = create_test_app(state).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let trace_id = resp
        .headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-trace-id header");
    assert!(uuid::Uuid::parse_str(trace_id).is_ok());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
    assert_eq!(body["activeSessions"], 0);
    assert_eq!(body["waitingPlayers"], 0);
    assert!(body["appVersion"].is_string());
    assert!(body["time"].as_str().is_some_and(|t| t.contains('T')));
}

#[actix_web::test]
async fn health_counts_live_games() {
    let state = memory_state(Arc::new(MemoryStore::new())).await;
    let flow = state.game_flow().clone();
    let app = create_test_app(state).await;

    flow.join_game(uuid::Uuid::new_v4(), "alice").await.unwrap();
    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["waitingPlayers"], 1);

    flow.join_game(uuid::Uuid::new_v4(), "bob").await.unwrap();
    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["waitingPlayers"], 0);
    assert_eq!(body["activeSessions"], 1);
}

#[actix_web::test]
async fn unknown_paths_are_not_found() {
    let state = memory_state(Arc::new(MemoryStore::new())).await;
    let app = create_test_app(state).await;
    let req = test::TestRequest::get().uri("/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
}
