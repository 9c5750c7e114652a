use uuid::Uuid;

use crate::domain::session::{
    ConnectionState, Outcome, PlayerSlot, Session, SessionStatus,
};
use crate::domain::Slot;
use crate::errors::domain::{DomainError, GameErrorKind};

fn human_vs_human() -> Session {
    Session::new(
        Uuid::new_v4(),
        PlayerSlot::human(1, "alice", Uuid::new_v4()),
        PlayerSlot::human(2, "bob", Uuid::new_v4()),
    )
}

fn play(session: &mut Session, cols: &[usize]) {
    for &col in cols {
        let slot = session.current_slot();
        session.apply_move(slot, col).unwrap();
    }
}

#[test]
fn new_session_starts_with_slot_one() {
    let session = human_vs_human();
    assert_eq!(session.status(), SessionStatus::Active);
    assert_eq!(session.current_slot(), Slot::One);
    assert_eq!(session.move_count(), 0);
    assert_eq!(session.outcome(), None);
    assert!(!session.has_bot());
}

#[test]
fn move_flips_turn_and_counts() {
    let mut session = human_vs_human();
    let applied = session.apply_move(Slot::One, 3).unwrap();
    assert_eq!(applied.row, 5);
    assert_eq!(applied.move_number, 1);
    assert_eq!(applied.outcome, None);
    assert_eq!(session.current_slot(), Slot::Two);
}

#[test]
fn wrong_turn_is_rejected_without_mutation() {
    let mut session = human_vs_human();
    let err = session.apply_move(Slot::Two, 0).unwrap_err();
    assert!(matches!(err, DomainError::Game(GameErrorKind::NotYourTurn, _)));
    assert_eq!(session.move_count(), 0);
    assert_eq!(session.board().disc_count(), 0);
}

#[test]
fn full_column_is_rejected() {
    let mut session = human_vs_human();
    play(&mut session, &[0, 0, 0, 0, 0, 0]);
    let err = session.apply_move(Slot::One, 0).unwrap_err();
    assert!(matches!(err, DomainError::Game(GameErrorKind::ColumnFull, _)));
    assert_eq!(session.current_slot(), Slot::One);
}

#[test]
fn horizontal_four_finishes_with_win() {
    let mut session = human_vs_human();
    play(&mut session, &[0, 0, 1, 1, 2, 2]);
    let applied = session.apply_move(Slot::One, 3).unwrap();
    assert_eq!(applied.outcome, Some(Outcome::Win { winner: Slot::One }));
    assert_eq!(session.status(), SessionStatus::Finished);
    assert!(session.completed_at().is_some());

    let err = session.apply_move(Slot::Two, 4).unwrap_err();
    assert!(matches!(err, DomainError::Game(GameErrorKind::NotActive, _)));
}

#[test]
fn filling_the_board_is_a_draw() {
    let mut session = human_vs_human();
    // Column pairs filled in an order that never lines up four.
    let order = [
        0, 1, 0, 1, 0, 1, 1, 0, 1, 0, 1, 0, 2, 3, 2, 3, 2, 3, 3, 2, 3, 2, 3, 2, 4, 5, 4, 5, 4,
        5, 5, 4, 5, 4, 5, 4, 6, 6, 6, 6, 6, 6,
    ];
    for (i, &col) in order.iter().enumerate() {
        let slot = session.current_slot();
        let applied = session.apply_move(slot, col).unwrap();
        if i + 1 < order.len() {
            assert_eq!(applied.outcome, None, "premature end at move {}", i + 1);
        } else {
            assert_eq!(applied.outcome, Some(Outcome::Draw));
        }
    }
    assert_eq!(session.move_count(), 42);
}

#[test]
fn forfeit_credits_the_other_slot() {
    let mut session = human_vs_human();
    let outcome = session.forfeit(Slot::Two).unwrap();
    assert_eq!(outcome, Outcome::Forfeit { winner: Slot::One });
    assert_eq!(session.outcome(), Some(outcome));
    assert!(session.forfeit(Slot::One).is_err());
}

#[test]
fn reconnect_rebinds_connection() {
    let mut session = human_vs_human();
    let old = session.slot(Slot::One).connection;
    let epoch = session.mark_disconnected(Slot::One);
    assert_eq!(epoch, 1);
    assert_eq!(
        session.slot(Slot::One).connection_state,
        ConnectionState::Disconnected
    );
    assert_eq!(session.slot(Slot::One).live_connection(), None);

    let fresh = Uuid::new_v4();
    assert_eq!(session.mark_connected(Slot::One, fresh), old);
    assert_eq!(session.slot_of(fresh), Some(Slot::One));
    assert!(session.slot(Slot::One).is_connected());
    assert_eq!(session.mark_disconnected(Slot::One), 2);
}

#[test]
fn bot_turn_detection() {
    let mut session = Session::new(
        Uuid::new_v4(),
        PlayerSlot::human(1, "alice", Uuid::new_v4()),
        PlayerSlot::bot("Bot"),
    );
    assert!(session.has_bot());
    assert!(!session.is_bot_turn());
    session.apply_move(Slot::One, 3).unwrap();
    assert!(session.is_bot_turn());
}

#[test]
fn outcome_serializes_with_kind_tag() {
    let json = serde_json::to_value(Outcome::Win { winner: Slot::Two }).unwrap();
    assert_eq!(json, serde_json::json!({"kind": "win", "winner": 2}));
    let json = serde_json::to_value(Outcome::Draw).unwrap();
    assert_eq!(json, serde_json::json!({"kind": "draw"}));
}
