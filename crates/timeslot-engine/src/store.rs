//! Storage capabilities the engine depends on, plus a JSON-backed in-memory
//! implementation.
//!
//! The engine never talks to a database directly. Recommendation only needs
//! [`SlotSource`]; the registry operations also need [`SlotStore`], and event
//! booking needs [`EventStore`].

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A stored identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
}

/// A meeting booked on one of its owner's stored slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    /// Id of the owning [`User`].
    pub owner: Uuid,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub participants: Vec<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("user '{0}' does not exist")]
    UnknownUser(String),

    #[error("user '{0}' already exists")]
    DuplicateUser(String),

    #[error("time slot '{expression}' not found for {user}")]
    SlotNotFound { user: String, expression: String },

    #[error("event {0} does not exist")]
    EventNotFound(Uuid),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Read access to users and their raw slot expressions.
pub trait SlotSource {
    fn fetch_user(&self, name: &str) -> StoreResult<User>;

    /// Raw expressions for `name`, in insertion order.
    fn fetch_raw_timeslots(&self, name: &str) -> StoreResult<Vec<String>>;
}

/// Write access on top of [`SlotSource`].
pub trait SlotStore: SlotSource {
    fn create_user(&mut self, name: &str) -> StoreResult<User>;

    /// Append `slots` to the user's stored expressions.
    fn store_timeslots(&mut self, user_id: Uuid, slots: &[String]) -> StoreResult<()>;

    /// Remove every stored copy of `expression` for `name`.
    fn delete_timeslot(&mut self, name: &str, expression: &str) -> StoreResult<()>;
}

/// Booked events on top of [`SlotStore`].
pub trait EventStore: SlotStore {
    fn store_event(&mut self, event: Event) -> StoreResult<()>;

    fn fetch_event(&self, id: Uuid) -> StoreResult<Event>;

    /// Events owned by `owner`, in booking order.
    fn fetch_events(&self, owner: Uuid) -> StoreResult<Vec<Event>>;

    fn delete_event(&mut self, id: Uuid) -> StoreResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredUser {
    #[serde(flatten)]
    user: User,
    #[serde(default)]
    timeslots: Vec<String>,
}

/// Users, their slots and booked events held in memory, serializable to a
/// JSON document:
///
/// ```json
/// {"users": [{"id": "…", "name": "eshan", "timeslots": ["02 Jan 2025 2-4 PM EST"]}],
///  "events": []}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    users: Vec<StoredUser>,
    #[serde(default)]
    events: Vec<Event>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Create `name` if needed and append `slots` without validating them.
    ///
    /// Handy for seeding fixtures that contain malformed legacy rows.
    pub fn with_raw_slots(mut self, name: &str, slots: &[&str]) -> Self {
        let idx = match self.position(name) {
            Some(idx) => idx,
            None => {
                self.users.push(StoredUser {
                    user: User {
                        id: Uuid::new_v4(),
                        name: name.to_string(),
                    },
                    timeslots: Vec::new(),
                });
                self.users.len() - 1
            }
        };
        self.users[idx]
            .timeslots
            .extend(slots.iter().map(|s| s.to_string()));
        self
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.users.iter().position(|u| u.user.name == name)
    }

    fn get(&self, name: &str) -> StoreResult<&StoredUser> {
        self.users
            .iter()
            .find(|u| u.user.name == name)
            .ok_or_else(|| StoreError::UnknownUser(name.to_string()))
    }
}

impl SlotSource for MemoryStore {
    fn fetch_user(&self, name: &str) -> StoreResult<User> {
        self.get(name).map(|u| u.user.clone())
    }

    fn fetch_raw_timeslots(&self, name: &str) -> StoreResult<Vec<String>> {
        self.get(name).map(|u| u.timeslots.clone())
    }
}

impl SlotStore for MemoryStore {
    fn create_user(&mut self, name: &str) -> StoreResult<User> {
        if self.position(name).is_some() {
            return Err(StoreError::DuplicateUser(name.to_string()));
        }
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.users.push(StoredUser {
            user: user.clone(),
            timeslots: Vec::new(),
        });
        Ok(user)
    }

    fn store_timeslots(&mut self, user_id: Uuid, slots: &[String]) -> StoreResult<()> {
        let stored = self
            .users
            .iter_mut()
            .find(|u| u.user.id == user_id)
            .ok_or_else(|| StoreError::UnknownUser(user_id.to_string()))?;
        stored.timeslots.extend_from_slice(slots);
        Ok(())
    }

    fn delete_timeslot(&mut self, name: &str, expression: &str) -> StoreResult<()> {
        let idx = self
            .position(name)
            .ok_or_else(|| StoreError::UnknownUser(name.to_string()))?;
        let timeslots = &mut self.users[idx].timeslots;
        let before = timeslots.len();
        timeslots.retain(|s| s != expression);
        if timeslots.len() == before {
            return Err(StoreError::SlotNotFound {
                user: name.to_string(),
                expression: expression.to_string(),
            });
        }
        Ok(())
    }
}

impl EventStore for MemoryStore {
    fn store_event(&mut self, event: Event) -> StoreResult<()> {
        if !self.users.iter().any(|u| u.user.id == event.owner) {
            return Err(StoreError::UnknownUser(event.owner.to_string()));
        }
        self.events.push(event);
        Ok(())
    }

    fn fetch_event(&self, id: Uuid) -> StoreResult<Event> {
        self.events
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(StoreError::EventNotFound(id))
    }

    fn fetch_events(&self, owner: Uuid) -> StoreResult<Vec<Event>> {
        Ok(self
            .events
            .iter()
            .filter(|e| e.owner == owner)
            .cloned()
            .collect())
    }

    fn delete_event(&mut self, id: Uuid) -> StoreResult<()> {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        if self.events.len() == before {
            return Err(StoreError::EventNotFound(id));
        }
        Ok(())
    }
}
