//! The description ledger: time-slot entries embedded in a tracked event's
//! free-text description, one `H:MMAM - H:MMPM: CODE` line per booking.
//!
//! Lines that do not look like an entry are ignored when scanning, so a
//! description may carry arbitrary notes; [`serialize`] only ever writes the
//! canonical entry lines back.

use std::fmt;
use std::sync::LazyLock;

use chrono::{NaiveTime, Timelike};
use log::debug;
use regex::Regex;
use serde::Serialize;

static CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d{1,2}):(\d{2})\s?([ap]m)$").expect("valid clock regex"));

static ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}:\d{2}\s?[ap]m) - (\d{1,2}:\d{2}\s?[ap]m): (\S+)")
        .expect("valid ledger entry regex")
});

/// One booked slot: wall-clock start and end (no date) plus its check-in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlotEntry {
    start: NaiveTime,
    end: NaiveTime,
    code: String,
}

impl TimeSlotEntry {
    /// Build an entry. Returns `None` when `start == end` or the code is blank.
    pub fn new(start: NaiveTime, end: NaiveTime, code: impl Into<String>) -> Option<Self> {
        let code = code.into();
        if start == end || code.trim().is_empty() || code.contains(char::is_whitespace) {
            return None;
        }
        Some(Self { start, end, code })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// The canonical one-line token, e.g. `6:00PM - 8:00PM: P7T4`.
    pub fn token(&self) -> String {
        format_token(self.start, self.end, &self.code)
    }
}

impl fmt::Display for TimeSlotEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

/// Render a wall-clock time as `H:MMAM`/`H:MMPM` with no leading hour zero.
pub fn format_clock(time: NaiveTime) -> String {
    let (is_pm, hour) = time.hour12();
    format!(
        "{}:{:02}{}",
        hour,
        time.minute(),
        if is_pm { "PM" } else { "AM" }
    )
}

/// Parse a 12-hour clock value such as `6:00pm`, `06:00PM` or `6:00 pm`.
pub fn parse_clock(text: &str) -> Option<NaiveTime> {
    let caps = CLOCK_RE.captures(text.trim())?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    if !(1..=12).contains(&hour) || minute >= 60 {
        return None;
    }
    let is_pm = caps[3].eq_ignore_ascii_case("pm");
    let hour24 = match (hour, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    NaiveTime::from_hms_opt(hour24, minute, 0)
}

/// `"<start> - <end>: <code>"` in canonical clock text.
pub fn format_token(start: NaiveTime, end: NaiveTime, code: &str) -> String {
    format!("{} - {}: {}", format_clock(start), format_clock(end), code)
}

/// Scan `text` for ledger entries, in order of appearance.
///
/// Anything that is not a well-formed entry is skipped: free text, clock
/// values out of range, and zero-length slots.
pub fn parse_entries(text: &str) -> Vec<TimeSlotEntry> {
    ENTRY_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let start = parse_clock(&caps[1])?;
            let end = parse_clock(&caps[2])?;
            let entry = TimeSlotEntry::new(start, end, &caps[3]);
            if entry.is_none() {
                debug!("skipping degenerate ledger entry {:?}", &caps[0]);
            }
            entry
        })
        .collect()
}

/// Render entries one canonical token per line, without a trailing newline.
pub fn serialize(entries: &[TimeSlotEntry]) -> String {
    entries
        .iter()
        .map(TimeSlotEntry::token)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

/// Stable ascending sort by start time; equal starts keep their input order.
pub fn sort_by_start(mut entries: Vec<TimeSlotEntry>) -> Vec<TimeSlotEntry> {
    entries.sort_by_key(|entry| entry.start);
    entries
}

/// Append a token to an existing description on a new line.
pub fn append_token(description: &str, token: &str) -> String {
    let existing = description.trim_end();
    if existing.is_empty() {
        token.to_string()
    } else {
        format!("{}\n{}", existing, token)
    }
}

/// Re-parse, sort and re-serialize a description.
pub fn canonicalize(description: &str) -> String {
    serialize(&sort_by_start(parse_entries(description)))
}
