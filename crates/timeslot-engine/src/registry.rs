//! User and time slot registration.
//!
//! Writes are strict: a batch of slot expressions is stored only if every one
//! of them parses. Reads return expressions exactly as stored.

use crate::dst::DstPolicy;
use crate::error::{EngineError, Result};
use crate::expression;
use crate::store::{SlotSource, SlotStore, User};

/// Register a new user.
///
/// # Errors
/// `InvalidRequest` for a blank name, `DuplicateUser` if it is taken.
pub fn register_user<S: SlotStore + ?Sized>(store: &mut S, name: &str) -> Result<User> {
    let name = name.trim();
    if name.is_empty() {
        return Err(EngineError::InvalidRequest(
            "user name must not be empty".to_string(),
        ));
    }
    let user = store
        .create_user(name)
        .map_err(|e| EngineError::from_store(name, e))?;
    tracing::info!(user = %user.name, id = %user.id, "registered user");
    Ok(user)
}

/// Validate and store `expressions` for `user_name`, all or nothing.
///
/// Returns the number of slots stored.
///
/// # Errors
/// - `UnknownPerson` if the user does not exist.
/// - `MalformedExpression` for the first expression that does not parse; nothing
///   is stored in that case.
pub fn create_timeslots<S, E>(
    store: &mut S,
    user_name: &str,
    expressions: &[E],
    dst: DstPolicy,
) -> Result<usize>
where
    S: SlotStore + ?Sized,
    E: AsRef<str>,
{
    let user = store
        .fetch_user(user_name)
        .map_err(|e| EngineError::from_store(user_name, e))?;

    let mut accepted = Vec::with_capacity(expressions.len());
    for raw in expressions {
        let raw = raw.as_ref();
        expression::parse_with_policy(raw, dst).map_err(|reason| {
            EngineError::MalformedExpression {
                expression: raw.to_string(),
                reason,
            }
        })?;
        accepted.push(raw.to_string());
    }

    store
        .store_timeslots(user.id, &accepted)
        .map_err(|e| EngineError::from_store(user_name, e))?;
    tracing::info!(user = user_name, count = accepted.len(), "stored time slots");
    Ok(accepted.len())
}

/// Raw expressions stored for `user_name`, in insertion order.
pub fn list_timeslots<S: SlotSource + ?Sized>(store: &S, user_name: &str) -> Result<Vec<String>> {
    store
        .fetch_raw_timeslots(user_name)
        .map_err(|e| EngineError::from_store(user_name, e))
}

/// Delete a stored expression by exact text.
///
/// # Errors
/// `NoTimeslots` when the user has nothing stored, `SlotNotFound` when
/// `expression` is not among their slots.
pub fn delete_timeslot<S: SlotStore + ?Sized>(
    store: &mut S,
    user_name: &str,
    expression: &str,
) -> Result<()> {
    let existing = list_timeslots(&*store, user_name)?;
    if existing.is_empty() {
        return Err(EngineError::NoTimeslots(user_name.to_string()));
    }
    if !existing.iter().any(|s| s == expression) {
        return Err(EngineError::SlotNotFound {
            user: user_name.to_string(),
            expression: expression.to_string(),
        });
    }
    store
        .delete_timeslot(user_name, expression)
        .map_err(|e| EngineError::from_store(user_name, e))?;
    tracing::info!(user = user_name, expression, "deleted time slot");
    Ok(())
}
