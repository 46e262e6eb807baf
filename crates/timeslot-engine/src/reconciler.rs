//! Reconcile an organizer's availability against every participant's.
//!
//! Each organizer interval is checked against every participant: a participant
//! is available for the slot when at least one of their intervals shares the
//! requested duration with it. Slots where everyone is available are full
//! matches; the rest are partial matches annotated with who can and cannot make
//! it. Output order follows the organizer's stored slot order.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::dst::DstPolicy;
use crate::error::{EngineError, ParseError, Result};
use crate::expression::{self, Interval};
use crate::overlap::{overlap_duration, overlaps};
use crate::store::SlotSource;

/// What to do with stored expressions that no longer parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidSlotPolicy {
    /// Drop the slot and list it in [`Recommendation::skipped`].
    #[default]
    Skip,
    /// Fail the whole recommendation with `MalformedExpression`.
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecommendOptions {
    #[serde(default)]
    pub invalid_slots: InvalidSlotPolicy,
    #[serde(default)]
    pub dst: DstPolicy,
}

/// One person's parsed availability for a single request.
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub name: String,
    /// May be empty: the person simply has no usable slots.
    pub intervals: Vec<Interval>,
}

impl Participant {
    pub fn new(name: impl Into<String>, intervals: Vec<Interval>) -> Self {
        Self {
            name: name.into(),
            intervals,
        }
    }

    /// Whether any of this person's intervals shares `min_duration` with `slot`.
    pub fn is_available(&self, slot: &Interval, min_duration: Duration) -> bool {
        self.intervals
            .iter()
            .any(|interval| overlaps(slot, interval, min_duration))
    }

    /// Longest time any of this person's intervals shares with `slot`, or
    /// `None` when none of them touch it.
    pub fn longest_overlap(&self, slot: &Interval) -> Option<Duration> {
        self.intervals
            .iter()
            .filter_map(|interval| overlap_duration(slot, interval))
            .max()
    }
}

/// A stored expression dropped during recommendation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSlot {
    pub person: String,
    pub expression: String,
    pub reason: ParseError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartialMatch {
    pub slot: Interval,
    pub available: Vec<String>,
    pub unavailable: Vec<String>,
}

/// Classification of a single organizer interval.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    FullMatch { slot: Interval },
    PartialMatch(PartialMatch),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recommendation {
    pub full_matches: Vec<Interval>,
    pub partial_matches: Vec<PartialMatch>,
    pub skipped: Vec<SkippedSlot>,
}

impl Recommendation {
    fn push(&mut self, outcome: MatchOutcome) {
        match outcome {
            MatchOutcome::FullMatch { slot } => self.full_matches.push(slot),
            MatchOutcome::PartialMatch(partial) => self.partial_matches.push(partial),
        }
    }
}

/// Classify one organizer `slot` against `participants`.
///
/// `available` and `unavailable` partition the participant names and keep
/// their input order. With no participants every slot is a full match.
pub fn classify_slot(
    slot: &Interval,
    participants: &[Participant],
    min_duration: Duration,
) -> MatchOutcome {
    let mut available = Vec::new();
    let mut unavailable = Vec::new();

    for participant in participants {
        let is_available = participant.is_available(slot, min_duration);
        tracing::debug!(
            %slot,
            person = %participant.name,
            shared_minutes = ?participant.longest_overlap(slot).map(|d| d.num_minutes()),
            is_available,
            "checked participant"
        );
        if is_available {
            available.push(participant.name.clone());
        } else {
            unavailable.push(participant.name.clone());
        }
    }

    if available.len() == participants.len() {
        MatchOutcome::FullMatch { slot: *slot }
    } else {
        MatchOutcome::PartialMatch(PartialMatch {
            slot: *slot,
            available,
            unavailable,
        })
    }
}

/// Classify every organizer interval, in order. Storage-free core of
/// [`recommend`].
pub fn reconcile(
    organizer: &Participant,
    participants: &[Participant],
    min_duration: Duration,
) -> Recommendation {
    let mut recommendation = Recommendation::default();
    for slot in &organizer.intervals {
        let outcome = classify_slot(slot, participants, min_duration);
        tracing::debug!(
            %slot,
            full = matches!(outcome, MatchOutcome::FullMatch { .. }),
            "classified organizer slot"
        );
        recommendation.push(outcome);
    }
    recommendation
}

/// Fetch and parse one person's stored slots, keeping fetch order.
///
/// Unparsable expressions are appended to `skipped` under
/// [`InvalidSlotPolicy::Skip`].
///
/// # Errors
/// - `UnknownPerson` / `StorageUnavailable` when the lookup fails.
/// - `MalformedExpression` for the first bad slot under [`InvalidSlotPolicy::Fail`].
pub fn load_participant<S: SlotSource + ?Sized>(
    source: &S,
    name: &str,
    options: &RecommendOptions,
    skipped: &mut Vec<SkippedSlot>,
) -> Result<Participant> {
    let raw_slots = source
        .fetch_raw_timeslots(name)
        .map_err(|e| EngineError::from_store(name, e))?;

    let mut intervals = Vec::with_capacity(raw_slots.len());
    for raw in raw_slots {
        match expression::parse_with_policy(&raw, options.dst) {
            Ok(interval) => intervals.push(interval),
            Err(reason) => match options.invalid_slots {
                InvalidSlotPolicy::Fail => {
                    return Err(EngineError::MalformedExpression {
                        expression: raw,
                        reason,
                    })
                }
                InvalidSlotPolicy::Skip => {
                    tracing::warn!(person = name, expression = %raw, %reason, "skipping stored time slot");
                    skipped.push(SkippedSlot {
                        person: name.to_string(),
                        expression: raw,
                        reason,
                    });
                }
            },
        }
    }

    tracing::debug!(person = name, slots = intervals.len(), "loaded availability");
    Ok(Participant::new(name, intervals))
}

/// Recommend meeting slots for `organizer` and `participants`.
///
/// Every person is loaded from `source` before any matching happens; a failed
/// lookup aborts the request without a partial result.
///
/// # Errors
/// - `InvalidRequest` for an empty organizer name or a negative duration.
/// - Any error from [`load_participant`].
pub fn recommend<S, P>(
    source: &S,
    organizer: &str,
    participants: &[P],
    min_duration: Duration,
    options: &RecommendOptions,
) -> Result<Recommendation>
where
    S: SlotSource + ?Sized,
    P: AsRef<str>,
{
    if organizer.trim().is_empty() {
        return Err(EngineError::InvalidRequest(
            "organizer must not be empty".to_string(),
        ));
    }
    if min_duration < Duration::zero() {
        return Err(EngineError::InvalidRequest(
            "event duration must not be negative".to_string(),
        ));
    }

    let mut skipped = Vec::new();
    let organizer = load_participant(source, organizer, options, &mut skipped)?;
    let participants = participants
        .iter()
        .map(|name| load_participant(source, name.as_ref(), options, &mut skipped))
        .collect::<Result<Vec<_>>>()?;

    let mut recommendation = reconcile(&organizer, &participants, min_duration);
    recommendation.skipped = skipped;
    Ok(recommendation)
}
