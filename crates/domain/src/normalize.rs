// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cell-value normalization for spreadsheet ingestion.
//!
//! These functions are pure and deterministic. They turn raw cell text
//! into the normalized forms the rest of the system stores and matches
//! on; anything context-dependent (alias lookup, dedup, credential
//! synthesis) lives upstream in the import pipeline.

use crate::error::DomainError;

/// Days between the spreadsheet serial epoch (1899-12-30) and the Unix
/// epoch (1970-01-01).
const SERIAL_EPOCH_OFFSET_DAYS: f64 = 25_569.0;

/// Seconds per day, for serial-date conversion.
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Normalizes an email cell.
///
/// Takes the first token when the cell holds several addresses
/// separated by `;`, `,`, or whitespace, then lowercases it.
/// Returns `None` when nothing usable remains.
#[must_use]
pub fn normalize_email(raw: &str) -> Option<String> {
    raw.trim()
        .split([';', ','])
        .flat_map(str::split_whitespace)
        .next()
        .map(str::to_lowercase)
}

/// Normalizes a phone cell.
///
/// Phones are stored as entered, trimmed; no digit filtering is
/// applied. Returns `None` when the cell is blank.
#[must_use]
pub fn normalize_phone(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

/// Normalizes a plan cell.
///
/// Plans are matched lowercase; a blank cell falls back to the default
/// plan.
#[must_use]
pub fn normalize_plan(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::from("annual");
    }
    trimmed.to_lowercase()
}

/// Converts a spreadsheet serial date to Unix seconds.
///
/// Serial 25569 is the Unix epoch; whole serials are midnight UTC.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn serial_to_unix_seconds(serial: f64) -> i64 {
    ((serial - SERIAL_EPOCH_OFFSET_DAYS) * SECONDS_PER_DAY).round() as i64
}

/// Converts a spreadsheet serial date to a calendar date.
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` if the serial falls
/// outside the representable date range.
pub fn serial_to_date(serial: f64) -> Result<time::Date, DomainError> {
    let seconds = serial_to_unix_seconds(serial);
    let timestamp = time::OffsetDateTime::from_unix_timestamp(seconds).map_err(|_| {
        DomainError::DateArithmeticOverflow {
            operation: format!("converting spreadsheet serial {serial}"),
        }
    })?;
    Ok(timestamp.date())
}

/// Parses a date cell.
///
/// Numeric cells are read as spreadsheet serial day counts; text cells
/// as `YYYY-MM-DD` or `MM/DD/YYYY`.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the cell matches neither
/// form, or `DomainError::DateArithmeticOverflow` if a serial falls
/// outside the representable date range.
pub fn parse_sheet_date(raw: &str) -> Result<time::Date, DomainError> {
    let trimmed = raw.trim();
    if let Ok(serial) = trimmed.parse::<f64>() {
        return serial_to_date(serial);
    }
    const ISO: &[time::format_description::BorrowedFormatItem<'_>] =
        time::macros::format_description!("[year]-[month]-[day]");
    const SLASH: &[time::format_description::BorrowedFormatItem<'_>] =
        time::macros::format_description!("[month]/[day]/[year]");
    time::Date::parse(trimmed, ISO)
        .or_else(|_| time::Date::parse(trimmed, SLASH))
        .map_err(|e| DomainError::DateParseError {
            date_string: trimmed.to_string(),
            error: e.to_string(),
        })
}

/// Returns the last four characters of a trimmed cell, in order.
///
/// Cells shorter than four characters are returned whole. Returns
/// `None` when the cell is blank.
#[must_use]
pub fn last_four(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let count = trimmed.chars().count();
    Some(trimmed.chars().skip(count.saturating_sub(4)).collect())
}

/// Coerces a numeric-looking cell into a count.
///
/// Fractional values are truncated; anything unparseable or negative
/// becomes 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn coerce_count(raw: &str) -> u32 {
    let Ok(value) = raw.trim().parse::<f64>() else {
        return 0;
    };
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.trunc() as u32
}

/// Resolves the covered-family-member count.
///
/// Rule: the count is the larger of the explicit count and the number
/// of family detail records supplied.
#[must_use]
pub fn family_member_count(explicit: u32, details_len: usize) -> u32 {
    explicit.max(u32::try_from(details_len).unwrap_or(u32::MAX))
}

/// Computes the date a new membership remains valid through.
///
/// Validity runs one year from the start date. A leap-day start rolls
/// to March 1 of the following year.
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` if the following year
/// is outside the representable date range.
pub fn membership_valid_until(from: time::Date) -> Result<time::Date, DomainError> {
    let next_year = from
        .year()
        .checked_add(1)
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: String::from("advancing membership validity year"),
        })?;
    match from.replace_year(next_year) {
        Ok(date) => Ok(date),
        Err(_) => time::Date::from_calendar_date(next_year, time::Month::March, 1).map_err(|_| {
            DomainError::DateArithmeticOverflow {
                operation: String::from("advancing membership validity year"),
            }
        }),
    }
}
