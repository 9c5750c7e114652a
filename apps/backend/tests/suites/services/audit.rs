use std::sync::Arc;

use backend::domain::OutcomeKind;
use backend::services::gateways::PersistenceGateway;

use crate::support::{fast_config, FlakyStore, Harness};

const VERTICAL_WIN: [i64; 7] = [0, 1, 0, 1, 0, 1, 0];

fn harness(store: &Arc<FlakyStore>) -> Harness {
    let gateway: Arc<dyn PersistenceGateway> = store.clone();
    Harness::with_store(fast_config(), gateway)
}

#[tokio::test]
async fn transient_finalize_failures_are_retried() {
    let store = FlakyStore::new();
    store.fail_next_finalizations(2);
    let h = harness(&store);
    let (alice, bob, session_id) = h.pair("alice", "bob").await;
    h.play(alice, bob, &VERTICAL_WIN);

    h.service.flush_audit().await;
    assert_eq!(store.finalize_calls(), 3);
    let game = store.inner.game(session_id).unwrap();
    assert_eq!(game.outcome, Some(OutcomeKind::Win));
    assert_eq!(store.inner.player("alice").unwrap().total_wins, 1);
}

#[tokio::test]
async fn finalize_gives_up_after_three_attempts() {
    let store = FlakyStore::new();
    store.fail_next_finalizations(10);
    let h = harness(&store);
    let (alice, bob, session_id) = h.pair("alice", "bob").await;
    h.play(alice, bob, &VERTICAL_WIN);

    h.service.flush_audit().await;
    assert_eq!(store.finalize_calls(), 3);
    assert!(!store.inner.game(session_id).unwrap().is_finished());
    assert_eq!(store.inner.player("alice").unwrap().total_games, 0);

    // Players still saw the result and can queue again.
    assert_eq!(h.transport.count(bob, "gameOver"), 1);
    h.service.join_game(alice, "alice").await.unwrap();
}

#[tokio::test]
async fn failed_move_writes_do_not_stop_the_game() {
    let store = FlakyStore::new();
    store.fail_moves(true);
    let h = harness(&store);
    let (alice, bob, session_id) = h.pair("alice", "bob").await;
    h.play(alice, bob, &VERTICAL_WIN);

    assert_eq!(h.transport.count(alice, "gameOver"), 1);
    h.service.flush_audit().await;
    assert!(store.inner.moves(session_id).is_empty());
    assert!(store.inner.game(session_id).unwrap().is_finished());
    assert_eq!(store.finalize_calls(), 1);
}

#[tokio::test]
async fn audit_writes_apply_in_order() {
    let store = FlakyStore::new();
    let h = harness(&store);
    let (alice, bob, session_id) = h.pair("alice", "bob").await;
    h.play(alice, bob, &[3, 3, 4, 4]);

    h.service.flush_audit().await;
    let moves = store.inner.moves(session_id);
    let columns: Vec<u8> = moves.iter().map(|m| m.column).collect();
    assert_eq!(columns, vec![3, 3, 4, 4]);
    assert_eq!(moves[1].row, 4);
}
