//! Cell-level parsers for loan CSV columns.
//!
//! Each parser returns `Ok(None)` for a blank cell and an error message for
//! a cell that is present but unreadable.

use std::str::FromStr;

use chrono::NaiveDate;

/// Date formats accepted in date columns, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parses a date cell.
///
/// # Errors
///
/// Returns a message if the cell matches none of [`DATE_FORMATS`].
pub fn parse_date(raw: &str) -> Result<Option<NaiveDate>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .map(Some)
        .ok_or_else(|| format!("unrecognized date '{trimmed}'"))
}

/// Parses a numeric cell. Thousands separators and a leading currency
/// sign are ignored.
///
/// # Errors
///
/// Returns a message if the cell is not a finite number.
pub fn parse_number(raw: &str) -> Result<Option<f64>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let cleaned: String = trimmed
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(format!("invalid number '{trimmed}'")),
    }
}

/// Parses a category cell such as a vehicle or fuel type.
///
/// Accepts the snake-case name in any case, with spaces or hyphens in
/// place of underscores (`Passenger Car`, `natural-gas`).
///
/// # Errors
///
/// Returns a message naming `what` if the value is not a known variant.
pub fn parse_category<T: FromStr>(raw: &str, what: &str) -> Result<Option<T>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let normalized = trimmed.replace([' ', '-'], "_");
    T::from_str(&normalized)
        .map(Some)
        .map_err(|_| format!("unknown {what} '{trimmed}'"))
}

/// Lowercases a header and strips separators, so `loan_id`, `loanId`, and
/// `Loan ID` all compare equal.
#[must_use]
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '_' | ' ' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}
