use std::sync::Arc;

use backend::adapters::MemoryStore;
use backend::domain::{Outcome, OutcomeKind, Slot};
use backend::protocol::ServerMsg;

use crate::support::{fast_config, Harness};

#[tokio::test]
async fn moves_are_broadcast_to_both_players() {
    let h = Harness::new(fast_config());
    let (alice, bob, _) = h.pair("alice", "bob").await;

    let applied = h.service.make_move(alice, 3).unwrap();
    assert_eq!((applied.column, applied.row), (3, 5));
    assert_eq!(applied.move_number, 1);

    for conn in [alice, bob] {
        match h.transport.last_of(conn, "moveMade") {
            Some(ServerMsg::MoveMade {
                grid,
                current_slot,
                column,
                row,
            }) => {
                assert_eq!((column, row), (3, 5));
                assert_eq!(current_slot, Slot::Two);
                assert_eq!(grid.get(5, 3), Some(Slot::One));
            }
            other => panic!("expected moveMade, got {other:?}"),
        }
    }

    let applied = h.service.make_move(bob, 3).unwrap();
    assert_eq!(applied.row, 4);
    assert_eq!(h.transport.count(alice, "moveMade"), 2);
}

#[tokio::test]
async fn moving_out_of_turn_is_rejected() {
    let h = Harness::new(fast_config());
    let (alice, bob, _) = h.pair("alice", "bob").await;

    let err = h.service.make_move(bob, 0).unwrap_err();
    assert_eq!(err.code().as_str(), "NOT_YOUR_TURN");

    h.service.make_move(alice, 0).unwrap();
    let err = h.service.make_move(alice, 1).unwrap_err();
    assert_eq!(err.code().as_str(), "NOT_YOUR_TURN");
    assert_eq!(h.transport.count(bob, "moveMade"), 1);
}

#[tokio::test]
async fn columns_outside_the_board_are_rejected() {
    let h = Harness::new(fast_config());
    let (alice, _, _) = h.pair("alice", "bob").await;

    for col in [-1, 7, 100] {
        let err = h.service.make_move(alice, col).unwrap_err();
        assert_eq!(err.code().as_str(), "INVALID_COLUMN", "column {col}");
    }
    // Turn is unchanged after a rejected move.
    h.service.make_move(alice, 6).unwrap();
}

#[tokio::test]
async fn full_column_is_rejected() {
    let h = Harness::new(fast_config());
    let (alice, bob, _) = h.pair("alice", "bob").await;
    h.play(alice, bob, &[0, 0, 0, 0, 0, 0]);

    let err = h.service.make_move(alice, 0).unwrap_err();
    assert_eq!(err.code().as_str(), "COLUMN_FULL");
    h.service.make_move(alice, 1).unwrap();
}

#[tokio::test]
async fn vertical_four_wins_and_is_persisted() {
    let store = Arc::new(MemoryStore::new());
    let h = Harness::with_store(fast_config(), store.clone());
    let (alice, bob, session_id) = h.pair("alice", "bob").await;

    h.play(alice, bob, &[0, 1, 0, 1, 0, 1, 0]);

    for conn in [alice, bob] {
        match h.transport.last_of(conn, "gameOver") {
            Some(ServerMsg::GameOver { outcome, grid }) => {
                assert_eq!(outcome, Outcome::Win { winner: Slot::One });
                assert_eq!(grid.winner(), Some(Slot::One));
            }
            other => panic!("expected gameOver, got {other:?}"),
        }
    }
    assert_eq!(h.service.active_sessions(), 0);

    h.service.flush_audit().await;
    let alice_rec = store.player("alice").unwrap();
    let bob_rec = store.player("bob").unwrap();
    let game = store.game(session_id).unwrap();
    assert!(game.is_finished());
    assert_eq!(game.winner_id, Some(alice_rec.id));
    assert_eq!(game.outcome, Some(OutcomeKind::Win));

    let moves = store.moves(session_id);
    assert_eq!(moves.len(), 7);
    assert_eq!(
        moves.iter().map(|m| m.move_number).collect::<Vec<_>>(),
        (1..=7).collect::<Vec<_>>()
    );
    assert_eq!((moves[0].player_id, moves[0].column, moves[0].row), (alice_rec.id, 0, 5));
    assert_eq!(moves[1].player_id, bob_rec.id);

    assert_eq!((alice_rec.total_games, alice_rec.total_wins), (1, 1));
    assert_eq!((bob_rec.total_games, bob_rec.total_losses), (1, 1));
}

#[tokio::test]
async fn moves_after_the_finish_are_rejected() {
    let h = Harness::new(fast_config());
    let (alice, bob, _) = h.pair("alice", "bob").await;
    h.play(alice, bob, &[0, 1, 0, 1, 0, 1, 0]);

    let err = h.service.make_move(bob, 2).unwrap_err();
    assert_eq!(err.code().as_str(), "GAME_NOT_ACTIVE");
    let err = h.service.make_move(alice, 2).unwrap_err();
    assert_eq!(err.code().as_str(), "GAME_NOT_ACTIVE");
    assert_eq!(h.transport.count(bob, "gameOver"), 1);
}

#[tokio::test]
async fn moving_without_a_game_is_rejected() {
    let h = Harness::new(fast_config());
    let err = h.service.make_move(Harness::conn(), 3).unwrap_err();
    assert_eq!(err.code().as_str(), "NOT_IN_GAME");

    let waiting = Harness::conn();
    h.service.join_game(waiting, "alice").await.unwrap();
    let err = h.service.make_move(waiting, 3).unwrap_err();
    assert_eq!(err.code().as_str(), "NOT_IN_GAME");
}
