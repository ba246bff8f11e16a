//! Localising venue wall-clock times across DST transitions.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Attach `tz` to a naive local datetime and convert it to an absolute instant.
///
/// On an autumn fold (the wall time occurs twice) the earlier instant wins.
/// Returns `None` for a wall time that falls inside a spring-forward gap.
pub fn localize(tz: Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

/// [`localize`] for a calendar date plus a wall-clock time.
pub fn localize_on(tz: Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    localize(tz, date.and_time(time))
}
