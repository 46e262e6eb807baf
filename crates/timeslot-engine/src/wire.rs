//! JSON request/response shapes for recommendation and event booking.
//!
//! Timestamps cross the boundary as RFC 3339 strings carrying the offset of the
//! timezone the slot was written in.

use chrono::{Duration, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::expression::Interval;
use crate::reconciler::{PartialMatch, Recommendation};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub organizer: String,
    #[serde(default)]
    pub participants: Vec<String>,
    /// Minutes.
    #[serde(alias = "event_duration")]
    pub event_duration: u32,
}

impl RecommendRequest {
    /// Reject requests without an organizer.
    pub fn validate(&self) -> Result<()> {
        if self.organizer.trim().is_empty() {
            return Err(EngineError::InvalidRequest(
                "organizer must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn min_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.event_duration))
    }
}

/// Book an event on one of the owner's stored slots.
///
/// Snake-case keys (`event_owner`, `event_time_slot`) are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub title: String,
    /// Owner's user name.
    #[serde(alias = "event_owner")]
    pub event_owner: String,
    /// Raw slot expression, matched verbatim against the owner's slots.
    #[serde(alias = "event_time_slot")]
    pub event_time_slot: String,
    #[serde(default)]
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDto {
    pub start_time: String,
    pub end_time: String,
}

impl From<&Interval> for SlotDto {
    fn from(interval: &Interval) -> Self {
        Self {
            start_time: interval
                .start()
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            end_time: interval.end().to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialMatchDto {
    pub slot: SlotDto,
    pub available_participants: Vec<String>,
    pub unavailable_participants: Vec<String>,
}

impl From<&PartialMatch> for PartialMatchDto {
    fn from(partial: &PartialMatch) -> Self {
        Self {
            slot: SlotDto::from(&partial.slot),
            available_participants: partial.available.clone(),
            unavailable_participants: partial.unavailable.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendResponse {
    pub matched_slots: Vec<SlotDto>,
    pub partially_matched_slots: Vec<PartialMatchDto>,
}

impl From<&Recommendation> for RecommendResponse {
    fn from(recommendation: &Recommendation) -> Self {
        Self {
            matched_slots: recommendation.full_matches.iter().map(SlotDto::from).collect(),
            partially_matched_slots: recommendation
                .partial_matches
                .iter()
                .map(PartialMatchDto::from)
                .collect(),
        }
    }
}
