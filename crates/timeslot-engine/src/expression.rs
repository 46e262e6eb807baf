//! Availability expressions -- converts `"02 Jan 2025 2-4 PM EST"` into a
//! timezone-aware interval.
//!
//! The grammar is fixed: six tokens separated by single spaces,
//! `<DD> <Mon> <YYYY> <startHour>-<endHour> <AM|PM> <timezone>`. The day is
//! zero-padded and the year has four digits. Both hours share the meridiem and
//! the date. The timezone is any name `chrono-tz` knows,
//! which covers IANA identifiers (`America/New_York`) and the tzdb abbreviation
//! zones (`EST`, `MST`, `UTC`).

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat};
use chrono_tz::Tz;

use crate::dst::DstPolicy;
use crate::error::ParseError;

/// A resolved availability window. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
}

impl Interval {
    /// Build an interval from two instants, rejecting `start > end`.
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Result<Self, ParseError> {
        if start > end {
            return Err(ParseError::EndBeforeStart);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Tz> {
        self.start
    }

    pub fn end(&self) -> DateTime<Tz> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// The timezone the interval was written in.
    pub fn timezone(&self) -> Tz {
        self.start.timezone()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            self.end.to_rfc3339_opts(SecondsFormat::AutoSi, true)
        )
    }
}

/// Parse a raw slot expression using the default [`DstPolicy`].
///
/// # Errors
/// Returns the [`ParseError`] describing the first problem found.
pub fn parse(raw: &str) -> Result<Interval, ParseError> {
    parse_with_policy(raw, DstPolicy::default())
}

/// Whether `raw` is a well-formed slot expression.
pub fn validate(raw: &str) -> bool {
    parse(raw).is_ok()
}

/// Parse a raw slot expression, resolving DST edge cases with `dst`.
///
/// # Errors
/// - `TokenCount` unless there are exactly 6 space-separated tokens.
/// - `HourRange` unless the 4th token is two non-empty hours joined by `-`.
/// - `UnknownTimezone` if the 6th token is not a known timezone.
/// - `InvalidDate`, `InvalidHour`, `InvalidMeridiem` for unparseable parts.
/// - `NonexistentLocalTime` / `AmbiguousLocalTime` per `dst`.
/// - `EndBeforeStart` if the end hour resolves before the start hour.
pub fn parse_with_policy(raw: &str, dst: DstPolicy) -> Result<Interval, ParseError> {
    let tokens: Vec<&str> = raw.split(' ').collect();
    let [day, month, year, hours, meridiem, timezone] = tokens.as_slice() else {
        return Err(ParseError::TokenCount(tokens.len()));
    };

    let (start_hour, end_hour) = match hours.split('-').collect::<Vec<_>>().as_slice() {
        [start, end] if !start.is_empty() && !end.is_empty() => (*start, *end),
        _ => return Err(ParseError::HourRange(hours.to_string())),
    };

    let tz: Tz = timezone
        .parse()
        .map_err(|_| ParseError::UnknownTimezone(timezone.to_string()))?;

    let date = parse_date(day, month, year)?;
    let pm = match meridiem.to_uppercase().as_str() {
        "AM" => false,
        "PM" => true,
        _ => return Err(ParseError::InvalidMeridiem(meridiem.to_string())),
    };

    let start = resolve_hour(date, start_hour, pm, tz, dst)?;
    let end = resolve_hour(date, end_hour, pm, tz, dst)?;

    Interval::new(start, end)
}

fn parse_date(day: &str, month: &str, year: &str) -> Result<NaiveDate, ParseError> {
    let text = format!("{} {} {}", day, month, year);
    let digits = |token: &str, len: usize| {
        token.len() == len && token.bytes().all(|b| b.is_ascii_digit())
    };
    if !digits(day, 2) || !digits(year, 4) {
        return Err(ParseError::InvalidDate(text));
    }
    NaiveDate::parse_from_str(&text, "%d %b %Y").map_err(|_| ParseError::InvalidDate(text))
}

/// Convert a 12-hour clock hour to 24-hour and resolve it on `date` in `tz`.
fn resolve_hour(
    date: NaiveDate,
    token: &str,
    pm: bool,
    tz: Tz,
    dst: DstPolicy,
) -> Result<DateTime<Tz>, ParseError> {
    let hour = match token.len() {
        1 | 2 if token.bytes().all(|b| b.is_ascii_digit()) => token.parse::<u32>().ok(),
        _ => None,
    }
    .filter(|h| *h <= 12)
    .ok_or_else(|| ParseError::InvalidHour(token.to_string()))?;

    let hour = match (hour, pm) {
        (12, false) => 0,
        (h, true) if h < 12 => h + 12,
        (h, _) => h,
    };

    let local = date
        .and_hms_opt(hour, 0, 0)
        .ok_or_else(|| ParseError::InvalidHour(token.to_string()))?;
    dst.resolve(tz, local)
}
