//! Decide how a new booking changes an existing tracked event.
//!
//! A tracked event and a booking refer to the same slot when they share a venue
//! (case-insensitive) and a local calendar date. [`decide`] gives the tentative
//! outcome from the windows alone; [`reconcile`] then folds the booking into the
//! description ledger and lets a gap in the ledger veto any window change.

use chrono::{DateTime, Days, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::dst::localize_on;
use crate::ledger::{append_token, parse_entries, serialize, sort_by_start};
use crate::merge::{find_gap, largest_continuous_interval, Gap, Interval};
use crate::parser::BookingRecord;
use crate::store::TrackedEvent;

/// An absolute time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    /// Inclusive overlap test: touching windows count.
    pub fn touches(&self, other: &Window) -> bool {
        (self.start <= other.start && other.start <= self.end)
            || (self.start <= other.end && other.end <= self.end)
            || (other.start <= self.start && other.end >= self.end)
    }

    /// Strictly separated: one ends before the other starts.
    pub fn is_disjoint(&self, other: &Window) -> bool {
        other.start > self.end || other.end < self.start
    }

    pub fn union(&self, other: &Window) -> Window {
        Window {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Tentative outcome for one tracked event.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// The booking overlaps or touches the window; extend to the union.
    ExtendWindow(Window),
    /// Same slot but separated by time; record it in the description only.
    AppendDescriptionOnly,
    /// Not the same slot; the caller should create a new tracked event.
    NoMatch,
}

/// Final outcome after the ledger has been merged.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    NoMatch,
    /// The booking is already listed, or nothing usable came out of the
    /// ledger; leave the event as it is.
    Unchanged,
    /// Rewrite the description, keep the window.
    DescriptionOnly {
        description: String,
        gap: Option<Gap>,
    },
    /// Rewrite both the window and the description.
    Extend { window: Window, description: String },
}

/// Classify `booking` against `existing` without looking at the ledger.
pub fn decide(existing: &TrackedEvent, booking: &BookingRecord, tz: Tz) -> Decision {
    if !same_slot(existing, booking, tz) {
        return Decision::NoMatch;
    }

    let current = existing.window();
    let incoming = Window {
        start: booking.start(),
        end: booking.end(),
    };

    if current.touches(&incoming) {
        Decision::ExtendWindow(current.union(&incoming))
    } else if current.is_disjoint(&incoming) {
        Decision::AppendDescriptionOnly
    } else {
        Decision::NoMatch
    }
}

/// Run the full pipeline: decide, append the booking's token to the ledger,
/// sort it, and check it for gaps before touching the window.
///
/// Any gap keeps the window as it is. Otherwise the final window comes from
/// the largest continuous run in the ledger, anchored to the existing event's
/// local date, whichever way [`decide`] leaned.
pub fn reconcile(existing: &TrackedEvent, booking: &BookingRecord, tz: Tz) -> Reconciliation {
    let decision = decide(existing, booking, tz);
    if decision == Decision::NoMatch {
        return Reconciliation::NoMatch;
    }

    // A confirmation already present in the ledger changes nothing.
    let already_listed = parse_entries(&existing.description)
        .iter()
        .any(|entry| entry.token() == booking.description());
    if already_listed {
        return Reconciliation::Unchanged;
    }

    let combined = append_token(&existing.description, booking.description());
    let entries = sort_by_start(parse_entries(&combined));
    if entries.is_empty() {
        return Reconciliation::Unchanged;
    }
    let description = serialize(&entries);
    let gap = find_gap(&entries);

    if gap.is_some() {
        return Reconciliation::DescriptionOnly { description, gap };
    }

    match largest_continuous_interval(&entries)
        .and_then(|interval| anchor_interval(existing, interval, tz))
    {
        Some(window) => Reconciliation::Extend {
            window,
            description,
        },
        // Run falls in a DST gap.
        None if decision == Decision::AppendDescriptionOnly => {
            Reconciliation::DescriptionOnly { description, gap }
        }
        None => Reconciliation::Unchanged,
    }
}

/// The first event (in the given order) that `booking` belongs to, along with
/// the tentative decision for it.
pub fn find_event_to_update<'a>(
    events: &'a [TrackedEvent],
    booking: &BookingRecord,
    tz: Tz,
) -> Option<(&'a TrackedEvent, Decision)> {
    events.iter().find_map(|event| match decide(event, booking, tz) {
        Decision::NoMatch => None,
        decision => Some((event, decision)),
    })
}

/// An event with the same name, start instant and venue as `booking`.
pub fn find_exact_event<'a>(
    events: &'a [TrackedEvent],
    booking: &BookingRecord,
) -> Option<&'a TrackedEvent> {
    events.iter().find(|event| {
        booking.event_name() == Some(event.name.as_str())
            && event.start == booking.start()
            && same_venue(&event.location, booking.location())
    })
}

fn same_venue(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Venue matches and the booking falls on the event's local date, or starts
/// the evening before and wraps past midnight into it.
fn same_slot(existing: &TrackedEvent, booking: &BookingRecord, tz: Tz) -> bool {
    if !same_venue(&existing.location, booking.location()) {
        return false;
    }

    let event_date = existing.start.with_timezone(&tz).date_naive();
    let booking_start = booking.start().with_timezone(&tz);
    let booking_end = booking.end().with_timezone(&tz);
    let booking_date = booking_start.date_naive();

    booking_date == event_date
        || (booking_start.time() > booking_end.time()
            && event_date.checked_sub_days(Days::new(1)) == Some(booking_date))
}

/// Map a wall-clock run onto the existing event's local date, rolling the end
/// to the next day when it wraps.
fn anchor_interval(existing: &TrackedEvent, interval: Interval, tz: Tz) -> Option<Window> {
    let start_date = existing.start.with_timezone(&tz).date_naive();
    let end_date = if interval.end < interval.start {
        start_date.checked_add_days(Days::new(1))?
    } else {
        start_date
    };
    Some(Window {
        start: localize_on(tz, start_date, interval.start)?,
        end: localize_on(tz, end_date, interval.end)?,
    })
}
