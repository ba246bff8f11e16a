//! Tests for description ledger scanning, serialization and ordering.

use booking_reconciler::ledger::{canonicalize, parse_entries, serialize, sort_by_start};
use booking_reconciler::TimeSlotEntry;
use chrono::NaiveTime;

fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn entry(start: (u32, u32), end: (u32, u32), code: &str) -> TimeSlotEntry {
    TimeSlotEntry::new(t(start.0, start.1), t(end.0, end.1), code).unwrap()
}

#[test]
fn scans_entries_in_order_of_appearance() {
    let text = "10:00AM - 12:00PM: 83VT\n2:00PM - 4:00PM: 91QX";
    let entries = parse_entries(text);

    assert_eq!(
        entries,
        vec![entry((10, 0), (12, 0), "83VT"), entry((14, 0), (16, 0), "91QX")]
    );
}

#[test]
fn ignores_free_text_and_fragments() {
    let text = "Study group for CS 2110\n\
                10:00AM - 12:00PM: 83VT\n\
                bring snacks\n\
                Check In Code: P7T4\n\
                12:00PM -\n\
                12:00PM - 2:00PM: 83VT";
    let entries = parse_entries(text);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].start(), t(12, 0));
}

#[test]
fn accepts_lowercase_and_leading_zero() {
    let entries = parse_entries("06:00pm - 08:00pm: P7T4");
    assert_eq!(entries, vec![entry((18, 0), (20, 0), "P7T4")]);
}

#[test]
fn skips_zero_length_and_out_of_range_entries() {
    let text = "6:00PM - 6:00PM: SAME\n13:00PM - 2:00PM: BAD\n7:00PM - 8:00PM: OK";
    let entries = parse_entries(text);
    assert_eq!(entries, vec![entry((19, 0), (20, 0), "OK")]);
}

#[test]
fn empty_description_has_no_entries() {
    assert!(parse_entries("").is_empty());
    assert!(parse_entries("no bookings yet").is_empty());
}

#[test]
fn serialize_writes_canonical_lines() {
    let entries = vec![entry((9, 5), (10, 0), "A1"), entry((12, 0), (0, 30), "B2")];
    assert_eq!(serialize(&entries), "9:05AM - 10:00AM: A1\n12:00PM - 12:30AM: B2");
}

#[test]
fn serialize_of_nothing_is_empty() {
    assert_eq!(serialize(&[]), "");
}

#[test]
fn serialized_text_parses_back_to_the_same_entries() {
    let entries = vec![entry((8, 0), (9, 30), "X"), entry((21, 15), (23, 45), "Y")];
    let text = serialize(&entries);
    assert_eq!(parse_entries(&text), entries);
    assert_eq!(serialize(&parse_entries(&text)), text);
}

#[test]
fn sort_orders_by_start() {
    let entries = vec![
        entry((20, 0), (22, 0), "C"),
        entry((10, 0), (12, 0), "A"),
        entry((14, 0), (16, 0), "B"),
    ];
    let sorted = sort_by_start(entries);
    let codes: Vec<&str> = sorted.iter().map(|e| e.code()).collect();
    assert_eq!(codes, vec!["A", "B", "C"]);
}

#[test]
fn sort_keeps_input_order_for_equal_starts() {
    let entries = vec![
        entry((10, 0), (13, 0), "LONG"),
        entry((9, 0), (10, 0), "EARLY"),
        entry((10, 0), (11, 0), "SHORT"),
    ];
    let sorted = sort_by_start(entries);
    let codes: Vec<&str> = sorted.iter().map(|e| e.code()).collect();
    assert_eq!(codes, vec!["EARLY", "LONG", "SHORT"]);
}

#[test]
fn canonicalize_sorts_and_normalises() {
    let description = "10:00AM - 12:00PM: 83VT\n\
                       12:00PM - 2:00PM: 83VT\n\
                       2:00PM - 4:00PM: 83VT\n\
                       8:00PM - 10:00PM: 83VT\n\
                       04:00PM - 06:00PM: 83VT\n";
    assert_eq!(
        canonicalize(description),
        "10:00AM - 12:00PM: 83VT\n\
         12:00PM - 2:00PM: 83VT\n\
         2:00PM - 4:00PM: 83VT\n\
         4:00PM - 6:00PM: 83VT\n\
         8:00PM - 10:00PM: 83VT"
    );
}

#[test]
fn entry_rejects_equal_start_and_end() {
    assert!(TimeSlotEntry::new(t(9, 0), t(9, 0), "X").is_none());
    assert!(TimeSlotEntry::new(t(9, 0), t(10, 0), "").is_none());
}
