//! Tests for user and slot registration.

use chrono::Duration;
use timeslot_engine::registry::{create_timeslots, delete_timeslot, list_timeslots, register_user};
use timeslot_engine::{
    recommend, DstPolicy, EngineError, MemoryStore, ParseError, RecommendOptions, SlotSource,
};

#[test]
fn register_user_trims_and_stores() {
    let mut store = MemoryStore::new();

    let user = register_user(&mut store, "  eshan ").unwrap();

    assert_eq!(user.name, "eshan");
    assert_eq!(store.fetch_user("eshan").unwrap(), user);
}

#[test]
fn register_user_rejects_blank_and_duplicate_names() {
    let mut store = MemoryStore::new();
    register_user(&mut store, "eshan").unwrap();

    assert!(matches!(
        register_user(&mut store, " "),
        Err(EngineError::InvalidRequest(_))
    ));
    assert!(matches!(
        register_user(&mut store, "eshan"),
        Err(EngineError::DuplicateUser(ref name)) if name == "eshan"
    ));
}

#[test]
fn create_timeslots_stores_valid_batch_in_order() {
    let mut store = MemoryStore::new();
    register_user(&mut store, "eshan").unwrap();

    let stored = create_timeslots(
        &mut store,
        "eshan",
        &["02 Jan 2025 2-4 PM EST", "14 Jan 2025 6-9 PM EST"],
        DstPolicy::default(),
    )
    .unwrap();

    assert_eq!(stored, 2);
    assert_eq!(
        list_timeslots(&store, "eshan").unwrap(),
        ["02 Jan 2025 2-4 PM EST", "14 Jan 2025 6-9 PM EST"]
    );
}

#[test]
fn one_bad_expression_rejects_the_whole_batch() {
    let mut store = MemoryStore::new();
    register_user(&mut store, "eshan").unwrap();

    let err = create_timeslots(
        &mut store,
        "eshan",
        &["02 Jan 2025 2-4 PM EST", "02 Jan 2025 2-4 PM"],
        DstPolicy::default(),
    )
    .unwrap_err();

    match err {
        EngineError::MalformedExpression { expression, reason } => {
            assert_eq!(expression, "02 Jan 2025 2-4 PM");
            assert_eq!(reason, ParseError::TokenCount(5));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(list_timeslots(&store, "eshan").unwrap().is_empty());
}

#[test]
fn strict_dst_policy_applies_at_creation() {
    let mut store = MemoryStore::new();
    register_user(&mut store, "eshan").unwrap();

    let lenient = create_timeslots(
        &mut store,
        "eshan",
        &["09 Mar 2025 2-4 AM America/New_York"],
        DstPolicy::Earliest,
    );
    let strict = create_timeslots(
        &mut store,
        "eshan",
        &["09 Mar 2025 2-4 AM America/New_York"],
        DstPolicy::Strict,
    );

    assert_eq!(lenient.unwrap(), 1);
    assert!(matches!(strict, Err(EngineError::MalformedExpression { .. })));
}

#[test]
fn create_timeslots_for_unknown_user_fails() {
    let mut store = MemoryStore::new();
    let err = create_timeslots(
        &mut store,
        "ghost",
        &["02 Jan 2025 2-4 PM EST"],
        DstPolicy::default(),
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::UnknownPerson(_)));
}

#[test]
fn missing_timezone_rejected_on_write_but_skipped_on_read() {
    let raw = "02 Jan 2025 2-4 PM";

    // Write path: rejected.
    let mut store = MemoryStore::new();
    register_user(&mut store, "eshan").unwrap();
    assert!(create_timeslots(&mut store, "eshan", &[raw], DstPolicy::default()).is_err());

    // Read path: a legacy row with the same text is dropped, not fatal.
    let legacy = MemoryStore::new()
        .with_raw_slots("eshan", &[raw, "02 Jan 2025 2-4 PM EST"])
        .with_raw_slots("kevin", &["02 Jan 2025 2-4 PM EST"]);
    let result = recommend(
        &legacy,
        "eshan",
        &["kevin"],
        Duration::minutes(30),
        &RecommendOptions::default(),
    )
    .unwrap();
    assert_eq!(result.full_matches.len(), 1);
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].expression, raw);
}

#[test]
fn delete_timeslot_removes_exact_text() {
    let mut store = MemoryStore::new()
        .with_raw_slots("eshan", &["02 Jan 2025 2-4 PM EST", "03 Jan 2025 2-4 PM EST"]);

    delete_timeslot(&mut store, "eshan", "02 Jan 2025 2-4 PM EST").unwrap();

    assert_eq!(
        list_timeslots(&store, "eshan").unwrap(),
        ["03 Jan 2025 2-4 PM EST"]
    );
}

#[test]
fn delete_timeslot_errors() {
    let mut store = MemoryStore::new()
        .with_raw_slots("eshan", &["02 Jan 2025 2-4 PM EST"])
        .with_raw_slots("kevin", &[]);

    assert!(matches!(
        delete_timeslot(&mut store, "kevin", "02 Jan 2025 2-4 PM EST"),
        Err(EngineError::NoTimeslots(_))
    ));
    assert!(matches!(
        delete_timeslot(&mut store, "eshan", "02 Jan 2025 2-5 PM EST"),
        Err(EngineError::SlotNotFound { .. })
    ));
    assert!(matches!(
        delete_timeslot(&mut store, "ghost", "02 Jan 2025 2-4 PM EST"),
        Err(EngineError::UnknownPerson(_))
    ));
}
