//! Tests for booking events on registered slots.

use chrono::{TimeZone, Utc};
use timeslot_engine::event::{create_event, delete_event, get_event, list_events};
use timeslot_engine::{
    DstPolicy, EngineError, Event, EventRequest, EventStore, MemoryStore, ParseError,
    SlotSource,
};
use uuid::Uuid;

// ── Helpers ─────────────────────────────────────────────────────────────────

const SLOT: &str = "02 Jan 2025 2-4 PM EST";

fn store() -> MemoryStore {
    MemoryStore::new()
        .with_raw_slots("eshan", &[SLOT, "03 Jan 2025 9-10 AM EST"])
        .with_raw_slots("idle", &[])
}

fn request(owner: &str, slot: &str) -> EventRequest {
    EventRequest {
        title: "Brainstorming meeting".to_string(),
        event_owner: owner.to_string(),
        event_time_slot: slot.to_string(),
        participants: vec!["kevin".to_string(), "marco".to_string()],
    }
}

fn book(store: &mut MemoryStore, owner: &str, slot: &str) -> Result<Event, EngineError> {
    create_event(store, &request(owner, slot), DstPolicy::default())
}

// ── Booking ─────────────────────────────────────────────────────────────────

#[test]
fn booking_an_owned_slot_stores_the_event() {
    let mut store = store();

    let event = book(&mut store, "eshan", SLOT).unwrap();

    assert_eq!(event.title, "Brainstorming meeting");
    assert_eq!(event.owner, store.fetch_user("eshan").unwrap().id);
    assert_eq!(event.participants, vec!["kevin", "marco"]);
    assert_eq!(event.start.to_rfc3339(), "2025-01-02T14:00:00-05:00");
    assert_eq!(
        event.end.with_timezone(&Utc),
        Utc.with_ymd_and_hms(2025, 1, 2, 21, 0, 0).unwrap()
    );
    assert_eq!(store.fetch_event(event.id).unwrap(), event);
}

#[test]
fn missing_owner_is_rejected() {
    let mut store = store();

    let err = book(&mut store, "ghost", SLOT).unwrap_err();

    assert!(matches!(err, EngineError::UnknownPerson(ref name) if name == "ghost"));
}

#[test]
fn owner_without_slots_is_rejected() {
    let mut store = store();

    let err = book(&mut store, "idle", SLOT).unwrap_err();

    assert!(matches!(err, EngineError::NoTimeslots(ref name) if name == "idle"));
}

#[test]
fn slot_not_owned_is_rejected() {
    let mut store = store();

    let err = book(&mut store, "eshan", "04 Jan 2025 2-4 PM EST").unwrap_err();

    match err {
        EngineError::SlotNotFound { user, expression } => {
            assert_eq!(user, "eshan");
            assert_eq!(expression, "04 Jan 2025 2-4 PM EST");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn equivalent_but_differently_written_slot_is_not_owned() {
    let mut store = store();

    // Same instants as SLOT, different text.
    let err = book(&mut store, "eshan", "02 Jan 2025 7-9 PM UTC").unwrap_err();

    assert!(matches!(err, EngineError::SlotNotFound { .. }));
}

#[test]
fn malformed_slot_is_rejected_before_lookup() {
    let mut store = MemoryStore::new().with_raw_slots("eshan", &["02 Jan 2025 2-4 PM"]);

    let err = book(&mut store, "eshan", "02 Jan 2025 2-4 PM").unwrap_err();

    match err {
        EngineError::MalformedExpression { expression, reason } => {
            assert_eq!(expression, "02 Jan 2025 2-4 PM");
            assert_eq!(reason, ParseError::TokenCount(5));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn blank_fields_are_invalid() {
    let mut store = store();

    let mut no_title = request("eshan", SLOT);
    no_title.title = "  ".to_string();
    let mut no_slot = request("eshan", SLOT);
    no_slot.event_time_slot = String::new();

    for req in [request("", SLOT), no_title, no_slot] {
        let err = create_event(&mut store, &req, DstPolicy::default()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRequest(_)), "{err}");
    }
    assert!(list_events(&store, "eshan").unwrap().is_empty());
}

#[test]
fn participants_may_be_empty() {
    let mut store = store();
    let mut solo = request("eshan", SLOT);
    solo.participants.clear();

    let event = create_event(&mut store, &solo, DstPolicy::default()).unwrap();

    assert!(event.participants.is_empty());
}

// ── Lookup and cancellation ─────────────────────────────────────────────────

#[test]
fn list_events_returns_owner_events_in_order() {
    let mut store = store().with_raw_slots("kevin", &[SLOT]);
    let first = book(&mut store, "eshan", SLOT).unwrap();
    book(&mut store, "kevin", SLOT).unwrap();
    let second = book(&mut store, "eshan", "03 Jan 2025 9-10 AM EST").unwrap();

    let events = list_events(&store, "eshan").unwrap();

    assert_eq!(events, vec![first, second]);
    assert!(list_events(&store, "idle").unwrap().is_empty());
    assert!(matches!(
        list_events(&store, "ghost"),
        Err(EngineError::UnknownPerson(_))
    ));
}

#[test]
fn get_and_delete_event() {
    let mut store = store();
    let event = book(&mut store, "eshan", SLOT).unwrap();

    assert_eq!(get_event(&store, event.id).unwrap(), event);

    delete_event(&mut store, event.id).unwrap();

    assert!(matches!(
        get_event(&store, event.id),
        Err(EngineError::EventNotFound(id)) if id == event.id
    ));
    assert!(matches!(
        delete_event(&mut store, event.id),
        Err(EngineError::EventNotFound(_))
    ));
}

#[test]
fn unknown_event_id_is_not_found() {
    let store = store();
    let id = Uuid::new_v4();

    assert!(matches!(
        get_event(&store, id),
        Err(EngineError::EventNotFound(found)) if found == id
    ));
}

#[test]
fn deleting_the_slot_keeps_booked_events() {
    let mut store = store();
    let event = book(&mut store, "eshan", SLOT).unwrap();

    timeslot_engine::registry::delete_timeslot(&mut store, "eshan", SLOT).unwrap();

    assert_eq!(get_event(&store, event.id).unwrap(), event);
}
