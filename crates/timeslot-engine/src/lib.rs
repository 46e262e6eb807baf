//! # timeslot-engine
//!
//! Meeting slot recommendation from free-text availability windows.
//!
//! Users describe availability as short expressions such as
//! `"02 Jan 2025 2-4 PM EST"`. The engine turns those into timezone-aware
//! intervals and, for a meeting request, works out which of the organizer's
//! windows suit every participant and which only suit some of them.
//!
//! ## Modules
//!
//! - [`expression`] — slot expression → [`Interval`]
//! - [`dst`] — DST transition policies used while resolving local times
//! - [`overlap`] — shared-duration check between two intervals
//! - [`reconciler`] — full/partial match classification across participants
//! - [`registry`] — user and slot registration with strict validation
//! - [`event`] — booking events on registered slots
//! - [`store`] — storage capability traits and an in-memory store
//! - [`wire`] — JSON request/response types
//! - [`error`] — Error types

pub mod dst;
pub mod error;
pub mod event;
pub mod expression;
pub mod overlap;
pub mod reconciler;
pub mod registry;
pub mod store;
pub mod wire;

pub use dst::DstPolicy;
pub use error::{EngineError, ParseError};
pub use expression::{parse, parse_with_policy, validate, Interval};
pub use overlap::{overlap_duration, overlaps};
pub use reconciler::{
    classify_slot, recommend, reconcile, InvalidSlotPolicy, MatchOutcome, Participant,
    PartialMatch, Recommendation, RecommendOptions, SkippedSlot,
};
pub use store::{Event, EventStore, MemoryStore, SlotSource, SlotStore, StoreError, User};
pub use wire::{EventRequest, RecommendRequest, RecommendResponse};
