//! Error types for timeslot-engine operations.

use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

/// Why a raw slot expression was rejected by the parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected 6 space-separated tokens, found {0}")]
    TokenCount(usize),

    #[error("hour range '{0}' must look like <start>-<end>")]
    HourRange(String),

    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("invalid hour '{0}'")]
    InvalidHour(String),

    #[error("meridiem must be AM or PM, got '{0}'")]
    InvalidMeridiem(String),

    #[error("local time {0} does not exist in the timezone")]
    NonexistentLocalTime(String),

    #[error("local time {0} is ambiguous in the timezone")]
    AmbiguousLocalTime(String),

    #[error("slot starts after it ends")]
    EndBeforeStart,
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("malformed time slot '{expression}': {reason}")]
    MalformedExpression {
        expression: String,
        reason: ParseError,
    },

    #[error("unknown person: {0}")]
    UnknownPerson(String),

    #[error("storage unavailable while looking up {name}: {reason}")]
    StorageUnavailable { name: String, reason: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("user '{0}' already exists")]
    DuplicateUser(String),

    #[error("time slot '{expression}' not found for {user}")]
    SlotNotFound { user: String, expression: String },

    #[error("no time slots found for {0}")]
    NoTimeslots(String),

    #[error("event {0} not found")]
    EventNotFound(Uuid),
}

impl EngineError {
    /// Attribute a storage failure to the person whose lookup triggered it.
    pub(crate) fn from_store(name: &str, err: StoreError) -> Self {
        match err {
            StoreError::UnknownUser(user) => EngineError::UnknownPerson(user),
            StoreError::DuplicateUser(user) => EngineError::DuplicateUser(user),
            StoreError::SlotNotFound { user, expression } => {
                EngineError::SlotNotFound { user, expression }
            }
            StoreError::EventNotFound(id) => EngineError::EventNotFound(id),
            StoreError::Unavailable(reason) => EngineError::StorageUnavailable {
                name: name.to_string(),
                reason,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
