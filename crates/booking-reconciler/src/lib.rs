//! # booking-reconciler
//!
//! Turns room-booking confirmation messages into tracked calendar events and
//! keeps one continuous event per venue and day as more bookings arrive.
//!
//! Each confirmation is parsed into a [`BookingRecord`]. Its one-line token is
//! appended to the matching tracked event's description, which doubles as a
//! ledger of every booked slot. The ledger is re-sorted and merged; the tracked
//! window only grows when the ledger has no gaps.
//!
//! ```rust
//! use booking_reconciler::{ledger, merge};
//!
//! let description = "2:00PM - 4:00PM: 83VT\n10:00AM - 12:00PM: 83VT\n12:00PM - 2:00PM: 83VT";
//! let entries = ledger::sort_by_start(ledger::parse_entries(description));
//! assert_eq!(merge::find_gap(&entries), None);
//! assert_eq!(
//!     merge::largest_continuous_interval(&entries).unwrap().to_string(),
//!     "10:00AM - 4:00PM"
//! );
//! ```
//!
//! ## Modules
//!
//! - [`parser`] — confirmation text → [`BookingRecord`]
//! - [`ledger`] — description text ⇄ time-slot entries
//! - [`merge`] — continuous runs, first gap, largest run
//! - [`reconcile`] — extend / append-only / no-match decisions
//! - [`store`] — tracked-event collaborator trait and an in-memory store
//! - [`apply`] — fetch/decide/write-back with revision checks
//! - [`dst`] — localising wall-clock times
//! - [`config`] — timezone configuration
//! - [`error`] — Error types

pub mod apply;
pub mod config;
pub mod dst;
pub mod error;
pub mod ledger;
pub mod merge;
pub mod parser;
pub mod reconcile;
pub mod store;

pub use apply::{apply_booking, schedule_booking, Applied};
pub use config::EngineConfig;
pub use error::{BookingError, ParseError, StoreError};
pub use ledger::TimeSlotEntry;
pub use merge::{find_gap, largest_continuous_interval, Gap, Interval};
pub use parser::{parse, BookingRecord};
pub use reconcile::{decide, reconcile, Decision, Reconciliation, Window};
pub use store::{MemoryStore, TrackedEvent, TrackedEventStore};
