#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loan portfolio CSV ingestion.
//!
//! Reads a CSV with one motor vehicle loan per row into [`LoanRecord`]s.
//! Structural problems (no header, required columns absent, unreadable
//! CSV) fail the whole file with [`IngestError`]. A row with a cell that
//! cannot be read is skipped and reported as a [`RowError`], so one bad
//! row never blocks the rest of the portfolio.
//!
//! A row whose text is not valid UTF-8 is skipped the same way, as is a
//! row repeating the loan ID of an earlier accepted row.
//!
//! Blank cells are not row errors: a blank vehicle or fuel type becomes
//! `None`, a blank balance becomes `0`, and the calculator reports these
//! with its own messages.

pub mod parsing;

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use pcaf_loan_models::{DEFAULT_ANNUAL_DISTANCE_KM, DistanceSource, LoanRecord};
use pcaf_vehicle_models::{EngineSizeClass, FuelType, VehicleType};

use crate::parsing::{normalize_header, parse_category, parse_date, parse_number};

/// Errors that fail an entire CSV file.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// File could not be opened.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The file has no header row.
    #[error("CSV file contains no header row")]
    NoHeader,

    /// Required columns are absent from the header.
    #[error("Missing required column(s): {}", columns.join(", "))]
    MissingColumns {
        /// Canonical names of the absent columns.
        columns: Vec<String>,
    },
}

/// A skipped data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based data row number (the header is not counted).
    pub row: u64,
    /// Loan ID from the row, when it could be read.
    pub loan_id: Option<String>,
    /// What was wrong with the row.
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.loan_id {
            Some(id) => write!(f, "row {} ({id}): {}", self.row, self.message),
            None => write!(f, "row {}: {}", self.row, self.message),
        }
    }
}

/// Loans read from a CSV file plus the rows that were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestOutcome {
    /// Successfully read loans, in file order.
    pub loans: Vec<LoanRecord>,
    /// Skipped rows, in file order.
    pub row_errors: Vec<RowError>,
}

/// A loan column and the normalized header spellings that map to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    LoanId,
    LoanAmount,
    OutstandingBalance,
    VehicleType,
    FuelType,
    EngineSize,
    VehicleMake,
    VehicleModel,
    VehicleValue,
    AnnualDistance,
    DistanceSource,
    FuelConsumption,
    OriginationDate,
    ReportingDate,
}

impl Column {
    const ALL: &[Self] = &[
        Self::LoanId,
        Self::LoanAmount,
        Self::OutstandingBalance,
        Self::VehicleType,
        Self::FuelType,
        Self::EngineSize,
        Self::VehicleMake,
        Self::VehicleModel,
        Self::VehicleValue,
        Self::AnnualDistance,
        Self::DistanceSource,
        Self::FuelConsumption,
        Self::OriginationDate,
        Self::ReportingDate,
    ];

    const fn canonical(self) -> &'static str {
        match self {
            Self::LoanId => "loan_id",
            Self::LoanAmount => "loan_amount",
            Self::OutstandingBalance => "outstanding_balance",
            Self::VehicleType => "vehicle_type",
            Self::FuelType => "fuel_type",
            Self::EngineSize => "engine_size",
            Self::VehicleMake => "vehicle_make",
            Self::VehicleModel => "vehicle_model",
            Self::VehicleValue => "vehicle_value",
            Self::AnnualDistance => "estimated_km_per_year",
            Self::DistanceSource => "distance_source",
            Self::FuelConsumption => "annual_fuel_consumption",
            Self::OriginationDate => "loan_origination_date",
            Self::ReportingDate => "reporting_date",
        }
    }

    const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::LoanId => &["loanid"],
            Self::LoanAmount => &["loanamount"],
            Self::OutstandingBalance => &["outstandingbalance", "balance"],
            Self::VehicleType => &["vehicletype", "vehiclecategory"],
            Self::FuelType => &["fueltype"],
            Self::EngineSize => &["enginesize", "enginesizeclass"],
            Self::VehicleMake => &["vehiclemake", "make"],
            Self::VehicleModel => &["vehiclemodel", "model"],
            Self::VehicleValue => &[
                "vehiclevalue",
                "vehiclevalueatorigination",
                "valueatorigination",
            ],
            Self::AnnualDistance => &[
                "estimatedkmperyear",
                "estimatedannualdistancekm",
                "annualdistancekm",
                "kmperyear",
                "annualmileage",
            ],
            Self::DistanceSource => &["distancesource", "distancedatasource"],
            Self::FuelConsumption => &["annualfuelconsumption", "actualfuelconsumption"],
            Self::OriginationDate => &["loanoriginationdate", "originationdate"],
            Self::ReportingDate => &["reportingdate"],
        }
    }

    const fn is_required(self) -> bool {
        matches!(
            self,
            Self::LoanId
                | Self::OutstandingBalance
                | Self::VehicleType
                | Self::FuelType
                | Self::VehicleValue
        )
    }
}

/// Header position of each known column.
#[derive(Debug, Default)]
struct ColumnMap {
    positions: [Option<usize>; Column::ALL.len()],
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, IngestError> {
        let mut map = Self::default();

        for (i, header) in headers.iter().enumerate() {
            let key = normalize_header(header);
            if let Some(idx) = Column::ALL.iter().position(|c| c.aliases().contains(&key.as_str()))
            {
                if map.positions[idx].is_none() {
                    map.positions[idx] = Some(i);
                } else {
                    log::warn!("Duplicate column '{header}' ignored");
                }
            } else if !key.is_empty() {
                log::debug!("Ignoring unrecognized column '{header}'");
            }
        }

        let missing: Vec<String> = Column::ALL
            .iter()
            .enumerate()
            .filter(|(idx, c)| c.is_required() && map.positions[*idx].is_none())
            .map(|(_, c)| c.canonical().to_string())
            .collect();

        if !missing.is_empty() {
            return Err(IngestError::MissingColumns { columns: missing });
        }

        Ok(map)
    }

    fn cell<'a>(&self, record: &'a csv::StringRecord, column: Column) -> &'a str {
        Column::ALL
            .iter()
            .position(|c| *c == column)
            .and_then(|idx| self.positions[idx])
            .and_then(|i| record.get(i))
            .unwrap_or("")
    }
}

/// Parses a loan CSV from `reader`.
///
/// # Errors
///
/// Returns [`IngestError`] if the header is absent, a required column is
/// missing, or the CSV itself cannot be read.
pub fn parse_loans_csv<R: Read>(reader: R) -> Result<IngestOutcome, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(IngestError::NoHeader);
    }
    let columns = ColumnMap::from_headers(&headers)?;

    let mut outcome = IngestOutcome::default();
    let mut first_rows: BTreeMap<String, u64> = BTreeMap::new();

    for (index, result) in reader.records().enumerate() {
        let row = index as u64 + 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => match e.kind() {
                csv::ErrorKind::Utf8 { err, .. } => {
                    let error = RowError {
                        row,
                        loan_id: None,
                        message: err.to_string(),
                    };
                    log::warn!("Skipping {error}");
                    outcome.row_errors.push(error);
                    continue;
                }
                _ => return Err(e.into()),
            },
        };

        if record.iter().all(str::is_empty) {
            continue;
        }

        let parsed = parse_row(&columns, &record).and_then(|loan| {
            if loan.loan_id.is_empty() {
                return Ok(loan);
            }
            match first_rows.get(&loan.loan_id) {
                Some(first) => Err(format!("duplicate loan ID (first seen in row {first})")),
                None => {
                    first_rows.insert(loan.loan_id.clone(), row);
                    Ok(loan)
                }
            }
        });

        match parsed {
            Ok(loan) => outcome.loans.push(loan),
            Err(message) => {
                let loan_id = Some(columns.cell(&record, Column::LoanId))
                    .filter(|id| !id.is_empty())
                    .map(str::to_string);
                let error = RowError {
                    row,
                    loan_id,
                    message,
                };
                log::warn!("Skipping {error}");
                outcome.row_errors.push(error);
            }
        }
    }

    log::info!(
        "Read {} loan(s) from CSV ({} row(s) skipped)",
        outcome.loans.len(),
        outcome.row_errors.len()
    );

    Ok(outcome)
}

/// Parses the loan CSV at `path`.
///
/// # Errors
///
/// Returns [`IngestError::Io`] if the file cannot be opened, otherwise as
/// [`parse_loans_csv`].
pub fn parse_loans_file(path: &Path) -> Result<IngestOutcome, IngestError> {
    log::info!("Reading loans from {}", path.display());
    let file = std::fs::File::open(path)?;
    parse_loans_csv(file)
}

fn parse_row(columns: &ColumnMap, record: &csv::StringRecord) -> Result<LoanRecord, String> {
    let cell = |column| columns.cell(record, column);

    let vehicle_type = parse_category::<VehicleType>(cell(Column::VehicleType), "vehicle type")?;
    let fuel_type = parse_category::<FuelType>(cell(Column::FuelType), "fuel type")?;
    let outstanding_balance = parse_number(cell(Column::OutstandingBalance))
        .map_err(|e| format!("outstanding balance: {e}"))?
        .unwrap_or(0.0);
    let vehicle_value_at_origination = parse_number(cell(Column::VehicleValue))
        .map_err(|e| format!("vehicle value: {e}"))?
        .unwrap_or(0.0);
    let loan_amount = parse_number(cell(Column::LoanAmount))
        .map_err(|e| format!("loan amount: {e}"))?
        .unwrap_or(0.0);
    let estimated_annual_distance_km = parse_number(cell(Column::AnnualDistance))
        .map_err(|e| format!("annual distance: {e}"))?
        .unwrap_or(DEFAULT_ANNUAL_DISTANCE_KM);
    let origination_date = parse_date(cell(Column::OriginationDate))
        .map_err(|e| format!("origination date: {e}"))?;
    let reporting_date =
        parse_date(cell(Column::ReportingDate)).map_err(|e| format!("reporting date: {e}"))?;
    let distance_source =
        parse_category::<DistanceSource>(cell(Column::DistanceSource), "distance source")?
            .unwrap_or_default();
    let annual_fuel_consumption = parse_number(cell(Column::FuelConsumption))
        .map_err(|e| format!("annual fuel consumption: {e}"))?;
    let text = |column| Some(cell(column)).filter(|v| !v.is_empty()).map(str::to_string);

    Ok(LoanRecord {
        loan_id: cell(Column::LoanId).to_string(),
        loan_amount,
        outstanding_balance,
        vehicle_type,
        fuel_type,
        engine_size_class: EngineSizeClass::new(cell(Column::EngineSize)),
        vehicle_make: text(Column::VehicleMake),
        vehicle_model: text(Column::VehicleModel),
        vehicle_value_at_origination,
        estimated_annual_distance_km,
        distance_source,
        annual_fuel_consumption,
        origination_date,
        reporting_date,
    })
}
