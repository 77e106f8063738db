#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reports for PCAF motor vehicle financed emissions.
//!
//! - [`write_loan_csv`]: loan-level detail, one row per calculation.
//! - [`render_text_summary`]: a plain-text portfolio disclosure.
//! - [`render_json_summary`]: the portfolio summary as JSON.

pub mod loans_csv;
pub mod summary;

use chrono::NaiveDate;

pub use loans_csv::write_loan_csv;
pub use summary::{render_json_summary, render_text_summary};

/// Errors that can occur while writing a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Who the report is for and which period it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    /// Reporting institution, if known.
    pub institution: Option<String>,
    /// Reporting period label, e.g. `2024`.
    pub reporting_period: String,
    /// Date the report was produced.
    pub report_date: NaiveDate,
}

impl ReportContext {
    /// Context for `reporting_period` dated today.
    #[must_use]
    pub fn new(institution: Option<String>, reporting_period: impl Into<String>) -> Self {
        Self {
            institution,
            reporting_period: reporting_period.into(),
            report_date: chrono::Local::now().date_naive(),
        }
    }
}
