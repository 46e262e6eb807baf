//! Event booking on top of registered slots.
//!
//! An event can only be booked on a slot its owner has already stored, matched
//! by exact text. The stored event keeps the resolved start and end with the
//! slot's UTC offset.

use uuid::Uuid;

use crate::dst::DstPolicy;
use crate::error::{EngineError, Result};
use crate::expression;
use crate::store::{Event, EventStore};
use crate::wire::EventRequest;

/// Validate `request` and store a new event.
///
/// # Errors
/// - `InvalidRequest` for a blank owner, title or slot.
/// - `UnknownPerson` if the owner does not exist.
/// - `MalformedExpression` if the slot does not parse.
/// - `NoTimeslots` when the owner has no stored slots.
/// - `SlotNotFound` when the slot is not one of the owner's.
pub fn create_event<S: EventStore + ?Sized>(
    store: &mut S,
    request: &EventRequest,
    dst: DstPolicy,
) -> Result<Event> {
    let owner_name = request.event_owner.trim();
    if owner_name.is_empty() {
        return Err(invalid("event owner is required"));
    }
    let owner = store
        .fetch_user(owner_name)
        .map_err(|e| EngineError::from_store(owner_name, e))?;

    let title = request.title.trim();
    if title.is_empty() {
        return Err(invalid("event title is required"));
    }
    let raw = request.event_time_slot.as_str();
    if raw.trim().is_empty() {
        return Err(invalid("event time slot is required"));
    }
    let interval = expression::parse_with_policy(raw, dst).map_err(|reason| {
        EngineError::MalformedExpression {
            expression: raw.to_string(),
            reason,
        }
    })?;

    let owned = store
        .fetch_raw_timeslots(owner_name)
        .map_err(|e| EngineError::from_store(owner_name, e))?;
    if owned.is_empty() {
        return Err(EngineError::NoTimeslots(owner_name.to_string()));
    }
    if !owned.iter().any(|s| s == raw) {
        return Err(EngineError::SlotNotFound {
            user: owner_name.to_string(),
            expression: raw.to_string(),
        });
    }

    let event = Event {
        id: Uuid::new_v4(),
        title: title.to_string(),
        owner: owner.id,
        start: interval.start().fixed_offset(),
        end: interval.end().fixed_offset(),
        participants: request.participants.clone(),
    };
    store
        .store_event(event.clone())
        .map_err(|e| EngineError::from_store(owner_name, e))?;
    tracing::info!(id = %event.id, owner = owner_name, title, "booked event");
    Ok(event)
}

/// Look up one event.
pub fn get_event<S: EventStore + ?Sized>(store: &S, id: Uuid) -> Result<Event> {
    store
        .fetch_event(id)
        .map_err(|e| EngineError::from_store(&id.to_string(), e))
}

/// Events owned by `user_name`, in booking order.
///
/// # Errors
/// `UnknownPerson` if the user does not exist.
pub fn list_events<S: EventStore + ?Sized>(store: &S, user_name: &str) -> Result<Vec<Event>> {
    let owner = store
        .fetch_user(user_name)
        .map_err(|e| EngineError::from_store(user_name, e))?;
    store
        .fetch_events(owner.id)
        .map_err(|e| EngineError::from_store(user_name, e))
}

/// Cancel an event.
///
/// # Errors
/// `EventNotFound` if no event has `id`.
pub fn delete_event<S: EventStore + ?Sized>(store: &mut S, id: Uuid) -> Result<()> {
    store
        .delete_event(id)
        .map_err(|e| EngineError::from_store(&id.to_string(), e))?;
    tracing::info!(%id, "deleted event");
    Ok(())
}

fn invalid(reason: &str) -> EngineError {
    EngineError::InvalidRequest(reason.to_string())
}
