//! DST transition policies for resolving wall-clock slot boundaries.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Policy for wall-clock times that fall inside a DST transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstPolicy {
    /// Ambiguous times (fall back) take the earlier instant. Times inside a
    /// spring-forward gap move forward exactly one hour, so a 30 minute gap
    /// lands 30 minutes past its end. A time still inside a gap after that
    /// step is rejected.
    #[default]
    Earliest,
    /// Reject both ambiguous and nonexistent local times.
    Strict,
}

impl DstPolicy {
    /// Resolve a naive local datetime to an instant in `tz`.
    pub fn resolve(self, tz: Tz, local: NaiveDateTime) -> Result<DateTime<Tz>, ParseError> {
        match tz.from_local_datetime(&local) {
            LocalResult::Single(dt) => Ok(dt),
            LocalResult::Ambiguous(earliest, _) => match self {
                DstPolicy::Earliest => Ok(earliest),
                DstPolicy::Strict => Err(ParseError::AmbiguousLocalTime(local.to_string())),
            },
            LocalResult::None => match self {
                // Step one hour past the gap; anything wider is rejected.
                DstPolicy::Earliest => tz
                    .from_local_datetime(&(local + Duration::hours(1)))
                    .earliest()
                    .ok_or_else(|| ParseError::NonexistentLocalTime(local.to_string())),
                DstPolicy::Strict => Err(ParseError::NonexistentLocalTime(local.to_string())),
            },
        }
    }
}
