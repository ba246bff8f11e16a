//! Error types for booking-reconciler operations.

use thiserror::Error;

/// Validation failures raised while parsing a booking confirmation.
///
/// Every variant names the field that could not be extracted. No partial
/// record is ever produced alongside one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing event name: expected `The following bookings \"<name>\" have been confirmed`")]
    MissingEventName,

    #[error("missing location: expected a `Space:` line")]
    MissingLocation,

    #[error("missing date: expected a `Date:` line")]
    MissingDate,

    #[error("missing time range: expected a `Time:` line")]
    MissingTimeRange,

    #[error("missing check-in code: expected a `Check In Code:` line")]
    MissingCheckinCode,

    #[error("malformed date: {0:?}")]
    MalformedDate(String),

    #[error("malformed time: {0:?}")]
    MalformedTime(String),

    #[error("unsupported midnight crossing: booking ends at {end} before it starts at {start}")]
    UnsupportedMidnightCrossing { start: String, end: String },
}

/// Failures reported by a [`TrackedEventStore`](crate::store::TrackedEventStore).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("tracked event not found: {0}")]
    NotFound(String),

    /// The event changed between fetch and write-back.
    #[error("tracked event {id} changed concurrently (expected revision {expected}, found {actual})")]
    Conflict { id: String, expected: u64, actual: u64 },

    #[error("store backend error: {0}")]
    Backend(String),
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("gave up after {attempts} conflicting write attempts")]
    RetriesExhausted { attempts: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BookingError>;
