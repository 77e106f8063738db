//! Temporal attribution: the share of the reporting year a loan was on the
//! books.
//!
//! Months are approximated as 30.44 days (the average Gregorian month), so a
//! loan outstanding from 1 January to 31 December scores just under 1.

use chrono::{Datelike, NaiveDate};

/// Average Gregorian month length in days.
pub const DAYS_PER_MONTH: f64 = 30.44;

/// Fraction of the reporting year during which the loan was outstanding,
/// in `[0, 1]`.
///
/// The reporting year is the calendar year of `reporting_date`. When either
/// date is missing the loan is treated as outstanding for the full year and
/// `1.0` is returned.
#[must_use]
pub fn temporal_attribution(
    origination_date: Option<NaiveDate>,
    reporting_date: Option<NaiveDate>,
) -> f64 {
    let (Some(origination), Some(reporting)) = (origination_date, reporting_date) else {
        return 1.0;
    };

    let year = reporting.year();
    let (Some(year_start), Some(year_end)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return 1.0;
    };

    let start = origination.max(year_start);
    let end = reporting.min(year_end);

    if start > end {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let days = (end - start).num_days() as f64;
    let months = days / DAYS_PER_MONTH;

    (months / 12.0).min(1.0)
}
