//! Tests for booking confirmation parsing.

use booking_reconciler::parser::{extract_date, extract_time_range, parse};
use booking_reconciler::ParseError;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::America::New_York;

const CONFIRMATION: &str = r#"The following bookings "STUDY SLAY" have been confirmed:

Space Information
Location: Georgia Tech Library Spaces
Space: Price Gilbert 2216
Date: Sunday, November 17, 2024
Time: 6:00pm - 8:00pm

Please note if you are booking a room for immediate use that it takes approximately 5-10 minutes from the time you book to the time when your card will be recognized at the door. If you've booked in advance, there should be no issue.

You are required to check in to your room on the display. If you do not check in within 10 minutes of your reservation, your reservation will be cancelled, and someone could book that room.

Check In Code: P7T4
"#;

fn without_line(prefix: &str) -> String {
    CONFIRMATION
        .lines()
        .filter(|line| !line.starts_with(prefix))
        .collect::<Vec<_>>()
        .join("\n")
}

fn with_line(prefix: &str, replacement: &str) -> String {
    CONFIRMATION
        .lines()
        .map(|line| if line.starts_with(prefix) { replacement } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn parses_every_field() {
    let record = parse(CONFIRMATION, New_York).expect("confirmation should parse");

    assert_eq!(record.event_name(), Some("STUDY SLAY"));
    assert_eq!(record.location(), "Price Gilbert 2216");
    assert_eq!(record.checkin_code(), "P7T4");
    // 18:00 EST (UTC-5) on Nov 17 is 23:00 UTC.
    assert_eq!(
        record.start(),
        Utc.with_ymd_and_hms(2024, 11, 17, 23, 0, 0).unwrap()
    );
    assert_eq!(
        record.end(),
        Utc.with_ymd_and_hms(2024, 11, 18, 1, 0, 0).unwrap()
    );
    assert_eq!(record.description(), "6:00PM - 8:00PM: P7T4");
}

#[test]
fn description_token_has_no_leading_zero() {
    let text = with_line("Time:", "Time: 09:30am - 11:00am");
    let record = parse(&text, New_York).unwrap();
    assert_eq!(record.description(), "9:30AM - 11:00AM: P7T4");
}

#[test]
fn timezone_is_a_parameter() {
    let record = parse(CONFIRMATION, chrono_tz::America::Los_Angeles).unwrap();
    // 18:00 PST (UTC-8) is 02:00 UTC the next day.
    assert_eq!(
        record.start(),
        Utc.with_ymd_and_hms(2024, 11, 18, 2, 0, 0).unwrap()
    );
    assert_eq!(record.description(), "6:00PM - 8:00PM: P7T4");
}

#[test]
fn indented_message_still_parses() {
    let indented: String = CONFIRMATION
        .lines()
        .map(|line| format!("        {}\n", line))
        .collect();
    let record = parse(&indented, New_York).unwrap();
    assert_eq!(record.location(), "Price Gilbert 2216");
    assert_eq!(record.checkin_code(), "P7T4");
}

#[test]
fn missing_checkin_code_is_reported() {
    let text = without_line("Check In Code:");
    assert_eq!(parse(&text, New_York), Err(ParseError::MissingCheckinCode));
}

#[test]
fn empty_checkin_code_is_missing() {
    let text = with_line("Check In Code:", "Check In Code:");
    assert_eq!(parse(&text, New_York), Err(ParseError::MissingCheckinCode));
}

#[test]
fn missing_event_name_is_reported() {
    let text = with_line("The following bookings", "Your bookings are confirmed:");
    assert_eq!(parse(&text, New_York), Err(ParseError::MissingEventName));
}

#[test]
fn missing_location_is_reported() {
    let text = without_line("Space:");
    assert_eq!(parse(&text, New_York), Err(ParseError::MissingLocation));
}

#[test]
fn missing_date_is_reported() {
    let text = without_line("Date:");
    assert_eq!(parse(&text, New_York), Err(ParseError::MissingDate));
}

#[test]
fn missing_time_is_reported() {
    let text = without_line("Time:");
    assert_eq!(parse(&text, New_York), Err(ParseError::MissingTimeRange));
}

#[test]
fn malformed_date_names_the_value() {
    let text = with_line("Date:", "Date: 2024-11-17");
    assert_eq!(
        parse(&text, New_York),
        Err(ParseError::MalformedDate("2024-11-17".to_string()))
    );

    let text = with_line("Date:", "Date: Sunday, Novembruary 17, 2024");
    assert!(matches!(
        parse(&text, New_York),
        Err(ParseError::MalformedDate(_))
    ));
}

#[test]
fn malformed_time_names_the_value() {
    let text = with_line("Time:", "Time: 6pm to 8pm");
    assert_eq!(
        parse(&text, New_York),
        Err(ParseError::MalformedTime("6pm to 8pm".to_string()))
    );
}

#[test]
fn midnight_crossing_is_rejected() {
    let text = with_line("Time:", "Time: 11:00pm - 1:00am");
    assert_eq!(
        parse(&text, New_York),
        Err(ParseError::UnsupportedMidnightCrossing {
            start: "11:00PM".to_string(),
            end: "1:00AM".to_string(),
        })
    );
}

#[test]
fn ending_at_midnight_is_a_crossing() {
    let text = with_line("Time:", "Time: 10:00pm - 12:00am");
    assert!(matches!(
        parse(&text, New_York),
        Err(ParseError::UnsupportedMidnightCrossing { .. })
    ));
}

#[test]
fn zero_length_booking_is_malformed() {
    let text = with_line("Time:", "Time: 6:00pm - 6:00pm");
    assert!(matches!(
        parse(&text, New_York),
        Err(ParseError::MalformedTime(_))
    ));
}

#[test]
fn wall_time_in_spring_forward_gap_is_malformed() {
    let text = with_line("Date:", "Date: Sunday, March 8, 2026");
    let text = text.replace("Time: 6:00pm - 8:00pm", "Time: 2:15am - 4:00am");
    assert!(matches!(
        parse(&text, New_York),
        Err(ParseError::MalformedTime(_))
    ));
}

#[test]
fn date_extractor_accepts_single_digit_day() {
    let date = extract_date("Date: Friday, March 6, 2026").unwrap();
    assert_eq!(date, NaiveDate::from_ymd_opt(2026, 3, 6).unwrap());
}

#[test]
fn time_extractor_returns_both_clocks() {
    let (start, end) = extract_time_range("Time: 12:00pm - 2:30pm").unwrap();
    assert_eq!(start, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    assert_eq!(end, NaiveTime::from_hms_opt(14, 30, 0).unwrap());
}

#[test]
fn error_messages_name_the_field() {
    assert!(ParseError::MissingCheckinCode.to_string().contains("check-in code"));
    assert!(ParseError::MissingLocation.to_string().contains("Space:"));
    assert!(ParseError::MalformedDate("x".into()).to_string().contains("date"));
}
