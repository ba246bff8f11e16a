//! Fetch / decide / write-back against a [`TrackedEventStore`].
//!
//! Every write is conditioned on the revision seen at fetch time. When another
//! writer got there first the whole decision is recomputed from a fresh fetch.

use chrono_tz::Tz;
use log::{debug, info, warn};

use crate::error::{BookingError, Result, StoreError};
use crate::merge::Gap;
use crate::parser::BookingRecord;
use crate::reconcile::{find_event_to_update, find_exact_event, reconcile, Reconciliation};
use crate::store::{EventEdit, NewTrackedEvent, TrackedEvent, TrackedEventStore};

/// Fetch/decide/write rounds attempted before giving up on a contended event.
pub const MAX_ATTEMPTS: usize = 3;

/// What [`apply_booking`] did to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// No tracked event matched; a new one was created.
    Created(TrackedEvent),
    /// The window (and description) were rewritten.
    Extended(TrackedEvent),
    /// Only the description changed. `gap` is the first hole in the ledger, if any.
    DescriptionUpdated {
        event: TrackedEvent,
        gap: Option<Gap>,
    },
    /// The matching event already reflects the booking.
    Unchanged(TrackedEvent),
}

impl Applied {
    pub fn event(&self) -> &TrackedEvent {
        match self {
            Applied::Created(event)
            | Applied::Extended(event)
            | Applied::Unchanged(event)
            | Applied::DescriptionUpdated { event, .. } => event,
        }
    }
}

/// Fold `booking` into the store: extend or annotate the matching tracked
/// event, or create a new one when none matches.
///
/// # Errors
/// Store failures other than a revision conflict are returned immediately.
/// After [`MAX_ATTEMPTS`] conflicting writes this fails with
/// [`BookingError::RetriesExhausted`].
pub fn apply_booking<S>(store: &mut S, booking: &BookingRecord, tz: Tz) -> Result<Applied>
where
    S: TrackedEventStore + ?Sized,
{
    for attempt in 1..=MAX_ATTEMPTS {
        let events = store.fetch_tracked_events(booking.location())?;
        let Some((event, _)) = find_event_to_update(&events, booking, tz) else {
            return create(store, booking).map(Applied::Created);
        };
        debug!("booking {} matches tracked event {}", booking.description(), event.id);

        let written = match reconcile(event, booking, tz) {
            Reconciliation::NoMatch => return create(store, booking).map(Applied::Created),
            Reconciliation::Unchanged => return Ok(Applied::Unchanged(event.clone())),
            Reconciliation::DescriptionOnly { description, gap } => {
                if description == event.description {
                    return Ok(Applied::Unchanged(event.clone()));
                }
                store
                    .edit_tracked_event(&event.id, EventEdit::description(description), event.revision)
                    .map(|event| Applied::DescriptionUpdated { event, gap })
            }
            Reconciliation::Extend {
                window,
                description,
            } => {
                if window == event.window() && description == event.description {
                    return Ok(Applied::Unchanged(event.clone()));
                }
                store
                    .edit_tracked_event(
                        &event.id,
                        EventEdit::window_and_description(window, description),
                        event.revision,
                    )
                    .map(Applied::Extended)
            }
        };

        match written {
            Ok(applied) => return Ok(applied),
            Err(StoreError::Conflict { id, expected, actual }) => {
                warn!(
                    "tracked event {} moved from revision {} to {} (attempt {}/{}), refetching",
                    id, expected, actual, attempt, MAX_ATTEMPTS
                );
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(BookingError::RetriesExhausted {
        attempts: MAX_ATTEMPTS,
    })
}

/// Create a tracked event for `booking` without looking for one to extend.
///
/// Returns the existing event instead when one with the same name, start and
/// venue is already present.
pub fn schedule_booking<S>(store: &mut S, booking: &BookingRecord) -> Result<TrackedEvent>
where
    S: TrackedEventStore + ?Sized,
{
    let events = store.fetch_tracked_events(booking.location())?;
    if let Some(existing) = find_exact_event(&events, booking) {
        info!("booking already scheduled as {}", existing.id);
        return Ok(existing.clone());
    }
    create(store, booking)
}

fn create<S>(store: &mut S, booking: &BookingRecord) -> Result<TrackedEvent>
where
    S: TrackedEventStore + ?Sized,
{
    let name = booking
        .event_name()
        .unwrap_or_else(|| booking.location())
        .to_string();
    let created = store.create_tracked_event(NewTrackedEvent {
        name,
        description: booking.description().to_string(),
        start: booking.start(),
        end: booking.end(),
        location: booking.location().to_string(),
    })?;
    Ok(created)
}
