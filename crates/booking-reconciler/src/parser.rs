//! Booking confirmation parsing -- turns one confirmation message into a
//! [`BookingRecord`].
//!
//! Each field has its own extractor returning `Result<_, ParseError>`; the
//! record is assembled only when all of them succeed.
//!
//! ```text
//! The following bookings "STUDY SLAY" have been confirmed:
//!
//! Space Information
//! Location: Georgia Tech Library Spaces
//! Space: Price Gilbert 2216
//! Date: Sunday, November 17, 2024
//! Time: 6:00pm - 8:00pm
//! ...
//! Check In Code: P7T4
//! ```

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use log::debug;
use regex::Regex;
use serde::Serialize;

use crate::dst;
use crate::error::ParseError;
use crate::ledger::{format_clock, format_token, parse_clock};

static EVENT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"The following bookings? "(.*?)" (?:have|has) been confirmed"#)
        .expect("valid event name regex")
});

static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| anchored_line("Space"));

static DATE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| anchored_line("Date"));

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]+,\s*([A-Za-z]+ \d{1,2}, \d{4})$").expect("valid date regex")
});

static TIME_LINE_RE: LazyLock<Regex> = LazyLock::new(|| anchored_line("Time"));

static CHECKIN_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*Check In Code:[ \t]*(\S+)").expect("valid check-in code regex")
});

/// `<Label>: <rest of line>`, tolerant of indentation and trailing whitespace.
fn anchored_line(label: &str) -> Regex {
    Regex::new(&format!(r"(?m)^[ \t]*{}:[ \t]*(.*?)[ \t\r]*$", label))
        .expect("valid anchored line regex")
}

/// A single parsed booking confirmation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingRecord {
    event_name: Option<String>,
    location: String,
    checkin_code: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    description: String,
}

impl BookingRecord {
    /// Build a record from absolute instants, deriving the description token
    /// from the wall-clock times in `tz`.
    pub fn new(
        event_name: Option<String>,
        location: impl Into<String>,
        checkin_code: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        tz: Tz,
    ) -> Self {
        let checkin_code = checkin_code.into();
        let description = format_token(
            start.with_timezone(&tz).time(),
            end.with_timezone(&tz).time(),
            &checkin_code,
        );
        Self {
            event_name,
            location: location.into(),
            checkin_code,
            start,
            end,
            description,
        }
    }

    pub fn event_name(&self) -> Option<&str> {
        self.event_name.as_deref()
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn checkin_code(&self) -> &str {
        &self.checkin_code
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// The canonical ledger token, e.g. `6:00PM - 8:00PM: P7T4`.
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Parse a booking confirmation, localising its wall-clock date and times to `tz`.
///
/// # Errors
/// Returns the [`ParseError`] of the first field that is missing or malformed,
/// checked in message order: name, location, date, time range, check-in code.
/// A booking whose end clock precedes its start clock fails with
/// [`ParseError::UnsupportedMidnightCrossing`].
pub fn parse(raw: &str, tz: Tz) -> Result<BookingRecord, ParseError> {
    let event_name = extract_event_name(raw)?;
    let location = extract_location(raw)?;
    let date = extract_date(raw)?;
    let (start_time, end_time) = extract_time_range(raw)?;
    let checkin_code = extract_checkin_code(raw)?;

    let start = localize(tz, date, start_time)?;
    let end = localize(tz, date, end_time)?;

    debug!(
        "parsed booking {:?} at {} on {}: {} - {}",
        event_name,
        location,
        date,
        format_clock(start_time),
        format_clock(end_time)
    );

    Ok(BookingRecord {
        event_name: Some(event_name),
        location,
        description: format_token(start_time, end_time, &checkin_code),
        checkin_code,
        start,
        end,
    })
}

/// The quoted name in `The following bookings "<name>" have been confirmed`.
pub fn extract_event_name(raw: &str) -> Result<String, ParseError> {
    EVENT_NAME_RE
        .captures(raw)
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or(ParseError::MissingEventName)
}

/// The venue from the `Space:` line.
pub fn extract_location(raw: &str) -> Result<String, ParseError> {
    line_value(&LOCATION_RE, raw).ok_or(ParseError::MissingLocation)
}

/// The calendar date from `Date: <Weekday>, <Month> <day>, <year>`.
pub fn extract_date(raw: &str) -> Result<NaiveDate, ParseError> {
    let value = line_value(&DATE_LINE_RE, raw).ok_or(ParseError::MissingDate)?;
    let caps = DATE_RE
        .captures(&value)
        .ok_or_else(|| ParseError::MalformedDate(value.clone()))?;
    NaiveDate::parse_from_str(&caps[1], "%B %d, %Y")
        .map_err(|_| ParseError::MalformedDate(value.clone()))
}

/// The start and end clocks from `Time: <h:mm[ap]m> - <h:mm[ap]m>`.
///
/// The end must fall strictly after the start on the same day.
pub fn extract_time_range(raw: &str) -> Result<(NaiveTime, NaiveTime), ParseError> {
    let value = line_value(&TIME_LINE_RE, raw).ok_or(ParseError::MissingTimeRange)?;
    let malformed = || ParseError::MalformedTime(value.clone());

    let (start_text, end_text) = value.split_once('-').ok_or_else(malformed)?;
    let start = parse_clock(start_text).ok_or_else(malformed)?;
    let end = parse_clock(end_text).ok_or_else(malformed)?;

    if end < start {
        return Err(ParseError::UnsupportedMidnightCrossing {
            start: format_clock(start),
            end: format_clock(end),
        });
    }
    if end == start {
        return Err(malformed());
    }
    Ok((start, end))
}

/// The opaque token from the `Check In Code:` line.
pub fn extract_checkin_code(raw: &str) -> Result<String, ParseError> {
    CHECKIN_CODE_RE
        .captures(raw)
        .map(|caps| caps[1].to_string())
        .ok_or(ParseError::MissingCheckinCode)
}

fn line_value(re: &Regex, raw: &str) -> Option<String> {
    re.captures(raw)
        .map(|caps| caps[1].to_string())
        .filter(|value| !value.is_empty())
}

fn localize(tz: Tz, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>, ParseError> {
    dst::localize_on(tz, date, time).ok_or_else(|| {
        ParseError::MalformedTime(format!(
            "{} does not exist on {} in {}",
            format_clock(time),
            date,
            tz
        ))
    })
}
