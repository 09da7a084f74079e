// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    coerce_count, family_member_count, last_four, membership_valid_until, normalize_email,
    normalize_phone, normalize_plan, parse_sheet_date, serial_to_date, serial_to_unix_seconds,
};

#[test]
fn test_normalize_email_trims_and_lowercases() {
    assert_eq!(
        normalize_email("  John.Doe@Example.COM "),
        Some(String::from("john.doe@example.com"))
    );
}

#[test]
fn test_normalize_email_takes_first_of_several() {
    assert_eq!(
        normalize_email("a@b.c; d@e.f"),
        Some(String::from("a@b.c"))
    );
    assert_eq!(
        normalize_email("a@b.c,d@e.f"),
        Some(String::from("a@b.c"))
    );
    assert_eq!(
        normalize_email("a@b.c d@e.f"),
        Some(String::from("a@b.c"))
    );
}

#[test]
fn test_normalize_email_blank_is_none() {
    assert_eq!(normalize_email(""), None);
    assert_eq!(normalize_email("   "), None);
    assert_eq!(normalize_email(" ; , "), None);
}

#[test]
fn test_normalize_phone_trims() {
    assert_eq!(
        normalize_phone(" 9876543210 "),
        Some(String::from("9876543210"))
    );
}

#[test]
fn test_normalize_phone_keeps_formatting_characters() {
    // Phones are matched as entered; no digit filtering
    assert_eq!(
        normalize_phone("0471-234 5678"),
        Some(String::from("0471-234 5678"))
    );
}

#[test]
fn test_normalize_phone_blank_is_none() {
    assert_eq!(normalize_phone(""), None);
    assert_eq!(normalize_phone("   "), None);
}

#[test]
fn test_normalize_plan_defaults_and_lowercases() {
    assert_eq!(normalize_plan(""), "annual");
    assert_eq!(normalize_plan("   "), "annual");
    assert_eq!(normalize_plan(" Annual "), "annual");
    assert_eq!(normalize_plan("MONTHLY"), "monthly");
}

#[test]
fn test_serial_to_unix_seconds_epoch() {
    // Serial 25569 is the Unix epoch
    assert_eq!(serial_to_unix_seconds(25_569.0), 0);
    assert_eq!(serial_to_unix_seconds(25_570.0), 86_400);
}

#[test]
fn test_serial_to_date() {
    let date: time::Date = serial_to_date(45_658.0).unwrap();
    assert_eq!(
        date,
        time::Date::from_calendar_date(2025, time::Month::January, 1).unwrap()
    );
}

#[test]
fn test_serial_to_date_out_of_range() {
    assert!(serial_to_date(1.0e15).is_err());
}

#[test]
fn test_parse_sheet_date_numeric_cell_is_a_serial() {
    let date: time::Date = parse_sheet_date("45658").unwrap();
    assert_eq!(
        date,
        time::Date::from_calendar_date(2025, time::Month::January, 1).unwrap()
    );
}

#[test]
fn test_parse_sheet_date_text_cells() {
    let expected = time::Date::from_calendar_date(2027, time::Month::August, 30).unwrap();
    assert_eq!(parse_sheet_date("2027-08-30").unwrap(), expected);
    assert_eq!(parse_sheet_date(" 08/30/2027 ").unwrap(), expected);
}

#[test]
fn test_parse_sheet_date_rejects_garbage() {
    assert!(parse_sheet_date("next tuesday").is_err());
    assert!(parse_sheet_date("2027-13-01").is_err());
}

#[test]
fn test_last_four() {
    assert_eq!(last_four("9876543210"), Some(String::from("3210")));
    assert_eq!(last_four(" 9876 "), Some(String::from("9876")));
    // Shorter inputs come back whole
    assert_eq!(last_four("321"), Some(String::from("321")));
    assert_eq!(last_four(""), None);
    assert_eq!(last_four("   "), None);
}

#[test]
fn test_coerce_count() {
    assert_eq!(coerce_count("3"), 3);
    assert_eq!(coerce_count(" 3 "), 3);
    assert_eq!(coerce_count("2.9"), 2);
    assert_eq!(coerce_count("-1"), 0);
    assert_eq!(coerce_count("abc"), 0);
    assert_eq!(coerce_count(""), 0);
}

#[test]
fn test_family_member_count_takes_larger_source() {
    assert_eq!(family_member_count(2, 0), 2);
    assert_eq!(family_member_count(0, 3), 3);
    assert_eq!(family_member_count(2, 5), 5);
    assert_eq!(family_member_count(0, 0), 0);
}

#[test]
fn test_membership_valid_until_adds_one_year() {
    let start: time::Date =
        time::Date::from_calendar_date(2026, time::Month::August, 26).unwrap();
    let until: time::Date = membership_valid_until(start).unwrap();
    assert_eq!(
        until,
        time::Date::from_calendar_date(2027, time::Month::August, 26).unwrap()
    );
}

#[test]
fn test_membership_valid_until_rolls_leap_day() {
    let start: time::Date =
        time::Date::from_calendar_date(2024, time::Month::February, 29).unwrap();
    let until: time::Date = membership_valid_until(start).unwrap();
    assert_eq!(
        until,
        time::Date::from_calendar_date(2025, time::Month::March, 1).unwrap()
    );
}
