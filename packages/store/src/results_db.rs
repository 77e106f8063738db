//! Append-only calculation result log.
//!
//! Every insert draws a monotonically increasing `seq` from a sequence and
//! is stamped with `recorded_at`. The newest row for a loan is the one with
//! the highest `seq`.

use duckdb::Connection;
use pcaf_loan_models::CalculationResult;
use std::str::FromStr;

use pcaf_vehicle_models::{DataQualityScore, PcafDataOption};

use crate::StoreError;

const RESULT_COLUMNS: &str = "loan_id, attribution_factor, annual_emissions_tco2e,
    temporal_attribution, financed_emissions_tco2e, data_quality_score,
    pcaf_compliant, emission_factor_kg_co2_per_km, emission_factor_source,
    emission_factor_data_option, emission_factor_geographic_scope";

/// A stored calculation with its log position.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResult {
    /// Insertion order across the whole log.
    pub seq: i64,
    /// When the row was written.
    pub recorded_at: Option<chrono::DateTime<chrono::Utc>>,
    /// The calculation itself.
    pub result: CalculationResult,
}

pub(crate) fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE SEQUENCE IF NOT EXISTS calculation_results_seq START 1;

        CREATE TABLE IF NOT EXISTS calculation_results (
            seq BIGINT PRIMARY KEY DEFAULT nextval('calculation_results_seq'),
            loan_id TEXT NOT NULL,
            attribution_factor DOUBLE NOT NULL,
            annual_emissions_tco2e DOUBLE NOT NULL,
            temporal_attribution DOUBLE NOT NULL
                CHECK (temporal_attribution BETWEEN 0 AND 1),
            financed_emissions_tco2e DOUBLE NOT NULL,
            data_quality_score SMALLINT NOT NULL
                CHECK (data_quality_score BETWEEN 1 AND 5),
            pcaf_compliant BOOLEAN NOT NULL,
            emission_factor_kg_co2_per_km DOUBLE NOT NULL,
            emission_factor_source TEXT NOT NULL,
            emission_factor_data_option TEXT,
            emission_factor_geographic_scope TEXT,
            recorded_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP
        );",
    )?;
    Ok(())
}

/// Appends `results` to the log, in order.
///
/// Returns the number of rows written.
///
/// # Errors
///
/// Returns [`StoreError`] if an insert fails. Rows inserted before the
/// failure stay written unless the caller runs this inside a transaction,
/// as [`crate::save_calculations`] does.
pub fn append(conn: &Connection, results: &[CalculationResult]) -> Result<u64, StoreError> {
    if results.is_empty() {
        return Ok(0);
    }

    let mut stmt = conn.prepare(&format!(
        "INSERT INTO calculation_results ({RESULT_COLUMNS})
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    ))?;

    let mut written = 0u64;
    for r in results {
        let rows = stmt.execute(duckdb::params![
            r.loan_id,
            r.attribution_factor,
            r.annual_emissions_tco2e,
            r.temporal_attribution,
            r.financed_emissions_tco2e,
            i16::from(r.data_quality_score.value()),
            r.pcaf_compliant,
            r.emission_factor_kg_co2_per_km,
            r.emission_factor_source,
            r.emission_factor_data_option.map(|o| o.to_string()),
            r.emission_factor_geographic_scope,
        ])?;
        written += u64::try_from(rows).unwrap_or(0);
    }

    log::info!("Stored {written} calculation result(s)");
    Ok(written)
}

/// Returns the newest result for every loan, ordered by loan ID.
///
/// # Errors
///
/// Returns [`StoreError`] if the query fails or a row cannot be converted.
pub fn latest_results(conn: &Connection) -> Result<Vec<CalculationResult>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT seq, recorded_at::TEXT, {RESULT_COLUMNS}
         FROM calculation_results
         QUALIFY ROW_NUMBER() OVER (PARTITION BY loan_id ORDER BY seq DESC) = 1
         ORDER BY loan_id"
    ))?;
    stmt.raw_execute()?;

    let mut results = Vec::new();
    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next()? {
        results.push(read_row(row)?.result);
    }

    Ok(results)
}

/// Returns every stored result for `loan_id`, oldest first.
///
/// # Errors
///
/// Returns [`StoreError`] if the query fails or a row cannot be converted.
pub fn history(conn: &Connection, loan_id: &str) -> Result<Vec<StoredResult>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT seq, recorded_at::TEXT, {RESULT_COLUMNS}
         FROM calculation_results
         WHERE loan_id = ?
         ORDER BY seq"
    ))?;
    stmt.raw_bind_parameter(1, loan_id)?;
    stmt.raw_execute()?;

    let mut history = Vec::new();
    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next()? {
        history.push(read_row(row)?);
    }

    Ok(history)
}

/// Returns the total number of stored results.
///
/// # Errors
///
/// Returns [`StoreError`] if the query fails.
pub fn count(conn: &Connection) -> Result<u64, StoreError> {
    let mut stmt = conn.prepare("SELECT COUNT(*) FROM calculation_results")?;
    let count: i64 = stmt.query_row([], |row| row.get(0))?;
    #[allow(clippy::cast_sign_loss)]
    Ok(count as u64)
}

fn read_row(row: &duckdb::Row<'_>) -> Result<StoredResult, StoreError> {
    let seq: i64 = row.get(0)?;
    let recorded_at: Option<String> = row.get(1)?;
    let raw_score: i16 = row.get(7)?;
    let data_option: Option<String> = row.get(11)?;

    let data_quality_score = u8::try_from(raw_score)
        .ok()
        .and_then(|v| DataQualityScore::from_value(v).ok())
        .ok_or_else(|| StoreError::Conversion {
            message: format!("invalid data quality score {raw_score} in row {seq}"),
        })?;

    let emission_factor_data_option = data_option
        .as_deref()
        .map(|v| {
            PcafDataOption::from_str(v).map_err(|_| StoreError::Conversion {
                message: format!("invalid PCAF data option '{v}' in row {seq}"),
            })
        })
        .transpose()?;

    Ok(StoredResult {
        seq,
        recorded_at: recorded_at.as_deref().and_then(parse_timestamp),
        result: CalculationResult {
            loan_id: row.get(2)?,
            attribution_factor: row.get(3)?,
            annual_emissions_tco2e: row.get(4)?,
            temporal_attribution: row.get(5)?,
            financed_emissions_tco2e: row.get(6)?,
            data_quality_score,
            pcaf_compliant: row.get(8)?,
            emission_factor_kg_co2_per_km: row.get(9)?,
            emission_factor_source: row.get(10)?,
            emission_factor_data_option,
            emission_factor_geographic_scope: row.get(12)?,
        },
    })
}

/// Parses `DuckDB`'s `TIMESTAMPTZ::TEXT` output, with or without
/// fractional seconds.
fn parse_timestamp(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    use chrono::{DateTime, Utc};

    for fmt in ["%Y-%m-%d %H:%M:%S%#z", "%Y-%m-%d %H:%M:%S%.f%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    log::warn!("Failed to parse timestamp: {s:?}");
    None
}
