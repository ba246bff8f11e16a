//! Merge ledger entries into continuous runs and locate uncovered gaps.
//!
//! Every function here expects entries already ordered by
//! [`sort_by_start`](crate::ledger::sort_by_start). Times are wall-clock values
//! within one day; overnight runs are not unwrapped.

use std::fmt;

use chrono::NaiveTime;
use serde::Serialize;

use crate::ledger::{format_clock, TimeSlotEntry};

/// A wall-clock span `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Interval {
    /// Same-day clock difference in minutes, ignoring any date. Negative when
    /// the interval wraps past midnight.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", format_clock(self.start), format_clock(self.end))
    }
}

/// Uncovered time between two chronologically adjacent entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Gap {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Gap {
    pub fn as_interval(&self) -> Interval {
        Interval {
            start: self.start,
            end: self.end,
        }
    }
}

impl fmt::Display for Gap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_interval(), f)
    }
}

/// Return the first consecutive pair where the earlier entry ends strictly
/// before the next one starts.
///
/// Only the first gap is reported. Touching entries (`end == start`) are
/// continuous.
pub fn find_gap(entries: &[TimeSlotEntry]) -> Option<Gap> {
    entries.windows(2).find_map(|pair| {
        let (previous, next) = (&pair[0], &pair[1]);
        (previous.end() < next.start()).then(|| Gap {
            start: previous.end(),
            end: next.start(),
        })
    })
}

/// Coalesce overlapping or touching entries into continuous runs.
///
/// Returns runs in input order. Merging the runs again yields the same runs.
pub fn merge_intervals(entries: &[TimeSlotEntry]) -> Vec<Interval> {
    let mut merged: Vec<Interval> = Vec::new();
    for entry in entries {
        let next = Interval {
            start: entry.start(),
            end: entry.end(),
        };
        if let Some(current) = merged.last_mut() {
            if next.start <= current.end {
                // Overlapping or touching: extend the running interval.
                current.end = current.end.max(next.end);
                continue;
            }
        }
        merged.push(next);
    }
    merged
}

/// The longest continuous run, by same-day clock duration.
///
/// Ties keep the earliest run. Returns `None` only for empty input.
pub fn largest_continuous_interval(entries: &[TimeSlotEntry]) -> Option<Interval> {
    let mut best: Option<Interval> = None;
    for run in merge_intervals(entries) {
        match best {
            Some(current) if run.duration_minutes() <= current.duration_minutes() => {}
            _ => best = Some(run),
        }
    }
    best
}
