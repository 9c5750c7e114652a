use std::sync::Arc;
use std::time::Duration;

use backend::adapters::MemoryStore;
use backend::domain::Slot;
use backend::protocol::ServerMsg;

use crate::support::{fast_config, wait_until, FlakyStore, Harness};

const VERTICAL_WIN: [i64; 7] = [0, 1, 0, 1, 0, 1, 0];

#[tokio::test]
async fn second_player_is_paired_with_the_waiter() {
    let store = Arc::new(MemoryStore::new());
    let h = Harness::with_store(fast_config(), store.clone());
    let (alice, bob, session_id) = h.pair("alice", "bob").await;

    assert_eq!(h.slot_of(alice), Some(Slot::One));
    assert_eq!(h.slot_of(bob), Some(Slot::Two));
    assert_eq!(h.service.waiting_players(), 0);
    assert_eq!(h.service.active_sessions(), 1);

    match h.transport.last_of(alice, "gameFound") {
        Some(ServerMsg::GameFound {
            session_id: sid,
            opponent_name,
            opponent_is_bot,
            assigned_slot,
            current_slot,
            ..
        }) => {
            assert_eq!(sid, session_id);
            assert_eq!(opponent_name, "bob");
            assert!(!opponent_is_bot);
            assert_eq!(assigned_slot, Slot::One);
            assert_eq!(current_slot, Slot::One);
        }
        other => panic!("expected gameFound, got {other:?}"),
    }
    match h.transport.last_of(bob, "gameFound") {
        Some(ServerMsg::GameFound {
            opponent_name,
            assigned_slot,
            ..
        }) => {
            assert_eq!(opponent_name, "alice");
            assert_eq!(assigned_slot, Slot::Two);
        }
        other => panic!("expected gameFound, got {other:?}"),
    }

    h.service.flush_audit().await;
    let game = store.game(session_id).expect("game row");
    let alice_id = store.player("alice").expect("alice").id;
    let bob_id = store.player("bob").expect("bob").id;
    assert_eq!(game.player1_id, alice_id);
    assert_eq!(game.player2_id, Some(bob_id));
    assert!(!game.is_finished());
}

#[tokio::test]
async fn queue_is_first_in_first_out() {
    let h = Harness::new(fast_config());
    let (a, b, c) = (Harness::conn(), Harness::conn(), Harness::conn());
    h.service.join_game(a, "ann").await.unwrap();
    h.service.join_game(b, "ben").await.unwrap();
    h.service.join_game(c, "cat").await.unwrap();

    assert_eq!(h.slot_of(a), Some(Slot::One));
    assert_eq!(h.slot_of(b), Some(Slot::Two));
    assert_eq!(h.session_of(c), None);
    assert_eq!(h.service.waiting_players(), 1);
}

#[tokio::test]
async fn lone_waiter_gets_a_bot_after_the_timeout() {
    let mut config = fast_config();
    config.matchmaking_timeout = Duration::from_millis(40);
    let store = Arc::new(MemoryStore::new());
    let h = Harness::with_store(config, store.clone());

    let alice = Harness::conn();
    h.service.join_game(alice, "alice").await.unwrap();
    assert_eq!(h.transport.count(alice, "gameFound"), 0);

    match h.wait_for(alice, "gameFound").await {
        ServerMsg::GameFound {
            session_id,
            opponent_name,
            opponent_is_bot,
            assigned_slot,
            current_slot,
            ..
        } => {
            assert_eq!(opponent_name, "Bot");
            assert!(opponent_is_bot);
            assert_eq!(assigned_slot, Slot::One);
            assert_eq!(current_slot, Slot::One);

            h.service.flush_audit().await;
            let game = store.game(session_id).expect("bot game audited");
            assert_eq!(game.player2_id, None);
        }
        other => panic!("expected gameFound, got {other:?}"),
    }
    assert_eq!(h.service.waiting_players(), 0);
}

#[tokio::test]
async fn fallback_does_nothing_once_paired() {
    let mut config = fast_config();
    config.matchmaking_timeout = Duration::from_millis(30);
    let h = Harness::new(config);
    let (alice, _bob, _) = h.pair("alice", "bob").await;

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(h.transport.count(alice, "gameFound"), 1);
    assert_eq!(h.service.active_sessions(), 1);
    assert_eq!(h.service.registry().len(), 1);
}

#[tokio::test]
async fn joining_twice_while_waiting_is_rejected() {
    let h = Harness::new(fast_config());
    let alice = Harness::conn();
    h.service.join_game(alice, "alice").await.unwrap();

    let err = h.service.join_game(alice, "alice").await.unwrap_err();
    assert_eq!(err.code().as_str(), "ALREADY_QUEUED");
    assert_eq!(h.service.waiting_players(), 1);
}

#[tokio::test]
async fn joining_during_a_live_game_is_rejected() {
    let h = Harness::new(fast_config());
    let (alice, _, _) = h.pair("alice", "bob").await;

    let err = h.service.join_game(alice, "alice").await.unwrap_err();
    assert_eq!(err.code().as_str(), "ALREADY_IN_GAME");
    assert_eq!(h.service.waiting_players(), 0);
}

#[tokio::test]
async fn concurrent_joins_from_one_connection_seat_it_once() {
    let store = FlakyStore::new();
    store.yield_lookups(true);
    let h = Harness::with_store(fast_config(), store.clone());
    h.service.join_game(Harness::conn(), "ann").await.unwrap();

    // Both joins pass the early guard before either reaches the queue.
    let bob = Harness::conn();
    let (first, second) = tokio::join!(
        h.service.join_game(bob, "bob"),
        h.service.join_game(bob, "bob")
    );
    first.unwrap();
    let err = second.unwrap_err();
    assert_eq!(err.code().as_str(), "ALREADY_IN_GAME");

    assert_eq!(h.service.waiting_players(), 0);
    assert_eq!(h.slot_of(bob), Some(Slot::Two));
    assert_eq!(h.service.active_sessions(), 1);
}

#[tokio::test]
async fn players_can_queue_again_after_a_finished_game() {
    let h = Harness::new(fast_config());
    let (alice, bob, first) = h.pair("alice", "bob").await;
    h.play(alice, bob, &VERTICAL_WIN);

    h.service.join_game(alice, "alice").await.unwrap();
    assert_eq!(h.service.waiting_players(), 1);
    assert_eq!(h.session_of(alice), None);
    assert!(!h.transport.in_room(alice, first));

    h.service.join_game(bob, "bob").await.unwrap();
    let second = h.session_of(alice).expect("paired again");
    assert_ne!(first, second);
    assert_eq!(h.slot_of(alice), Some(Slot::One));
}

#[tokio::test]
async fn disconnecting_while_waiting_leaves_the_queue() {
    let mut config = fast_config();
    config.matchmaking_timeout = Duration::from_millis(40);
    let h = Harness::new(config);

    let alice = Harness::conn();
    h.service.join_game(alice, "alice").await.unwrap();
    h.service.handle_disconnect(alice);
    assert_eq!(h.service.waiting_players(), 0);

    // The stale fallback must not start a bot game for the departed player.
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(h.transport.count(alice, "gameFound"), 0);
    assert_eq!(h.service.registry().len(), 0);

    let bob = Harness::conn();
    h.service.join_game(bob, "bob").await.unwrap();
    assert_eq!(h.session_of(bob), None);
    assert!(wait_until(Duration::from_secs(2), || h.transport.count(bob, "gameFound") == 1).await);
}

#[tokio::test]
async fn usernames_are_validated() {
    let h = Harness::new(fast_config());
    for bad in ["", "   ", "abcdefghijklmnopqrstu"] {
        let err = h.service.join_game(Harness::conn(), bad).await.unwrap_err();
        assert_eq!(err.code().as_str(), "INVALID_USERNAME", "username {bad:?}");
    }
    assert_eq!(h.service.waiting_players(), 0);

    let alice = Harness::conn();
    h.service.join_game(alice, "  alice  ").await.unwrap();
    let bob = Harness::conn();
    h.service.join_game(bob, "bob").await.unwrap();
    match h.transport.last_of(bob, "gameFound") {
        Some(ServerMsg::GameFound { opponent_name, .. }) => assert_eq!(opponent_name, "alice"),
        other => panic!("expected gameFound, got {other:?}"),
    }
}
