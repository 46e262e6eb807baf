//! Decide whether two availability intervals share enough time for a meeting.
//!
//! The shared window is `max(a.start, b.start)..min(a.end, b.end)`. Its length
//! may be negative for disjoint intervals, which simply fails the comparison.

use chrono::Duration;

use crate::expression::Interval;

/// Whether `a` and `b` share at least `min_duration`.
///
/// A zero `min_duration` accepts any non-negative intersection, including two
/// intervals that merely touch at one instant.
pub fn overlaps(a: &Interval, b: &Interval, min_duration: Duration) -> bool {
    shared(a, b) >= min_duration
}

/// Length of the intersection of `a` and `b`, or `None` when they are disjoint.
///
/// Intervals touching at a single instant intersect with zero length.
pub fn overlap_duration(a: &Interval, b: &Interval) -> Option<Duration> {
    let length = shared(a, b);
    (length >= Duration::zero()).then_some(length)
}

fn shared(a: &Interval, b: &Interval) -> Duration {
    let start = a.start().max(b.start());
    let end = a.end().min(b.end());
    end - start
}
