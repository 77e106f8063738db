//! Loan-level CSV export.
//!
//! Column names match the ingest aliases, so an export can be read back as
//! a loan file. Each row also carries the PCAF data option assessed from
//! the loan's inputs, next to the option of the emission factor used.

use std::collections::BTreeMap;
use std::io::Write;

use pcaf_calculator::assess_data_quality;
use pcaf_loan_models::{CalculationResult, LoanRecord};

use crate::ReportError;

const HEADERS: &[&str] = &[
    "loan_id",
    "loan_amount",
    "outstanding_balance",
    "vehicle_type",
    "fuel_type",
    "engine_size",
    "vehicle_make",
    "vehicle_model",
    "vehicle_value",
    "estimated_km_per_year",
    "distance_source",
    "annual_fuel_consumption",
    "loan_origination_date",
    "reporting_date",
    "attribution_factor",
    "annual_emissions_tco2e",
    "temporal_attribution",
    "financed_emissions_tco2e",
    "data_quality_score",
    "pcaf_compliant",
    "emission_factor_kg_co2_per_km",
    "emission_factor_source",
    "emission_factor_data_option",
    "emission_factor_geographic_scope",
    "pcaf_option",
    "assessed_data_quality_score",
    "data_quality_drivers",
];

const INPUT_COLUMN_COUNT: usize = 13;

/// Writes one CSV row per entry in `results`, joined to `loans` by loan
/// ID. Input columns are left blank for results with no matching loan.
///
/// Returns the number of data rows written.
///
/// # Errors
///
/// Returns [`ReportError`] if writing to `writer` fails.
pub fn write_loan_csv<W: Write>(
    writer: W,
    loans: &[LoanRecord],
    results: &[CalculationResult],
) -> Result<u64, ReportError> {
    let by_id: BTreeMap<&str, &LoanRecord> =
        loans.iter().map(|l| (l.loan_id.as_str(), l)).collect();

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADERS)?;

    let mut written = 0u64;
    for result in results {
        let loan = by_id.get(result.loan_id.as_str()).copied();
        let inputs = loan.map_or_else(|| vec![String::new(); INPUT_COLUMN_COUNT], input_columns);

        let mut record = Vec::with_capacity(HEADERS.len());
        record.push(result.loan_id.clone());
        record.extend(inputs);
        record.extend([
            format!("{:.6}", result.attribution_factor),
            format!("{:.6}", result.annual_emissions_tco2e),
            format!("{:.6}", result.temporal_attribution),
            format!("{:.6}", result.financed_emissions_tco2e),
            result.data_quality_score.value().to_string(),
            result.pcaf_compliant.to_string(),
            format!("{:.4}", result.emission_factor_kg_co2_per_km),
            result.emission_factor_source.clone(),
            result
                .emission_factor_data_option
                .map(|o| o.to_string())
                .unwrap_or_default(),
            result
                .emission_factor_geographic_scope
                .clone()
                .unwrap_or_default(),
        ]);
        record.extend(assessment_columns(loan));

        csv_writer.write_record(&record)?;
        written += 1;
    }

    csv_writer.flush()?;
    Ok(written)
}

fn input_columns(loan: &LoanRecord) -> Vec<String> {
    let date = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();

    vec![
        format!("{:.2}", loan.loan_amount),
        format!("{:.2}", loan.outstanding_balance),
        loan.vehicle_type
            .map(|v| v.as_ref().to_string())
            .unwrap_or_default(),
        loan.fuel_type
            .map(|f| f.as_ref().to_string())
            .unwrap_or_default(),
        loan.engine_size_class.to_string(),
        loan.vehicle_make.clone().unwrap_or_default(),
        loan.vehicle_model.clone().unwrap_or_default(),
        format!("{:.2}", loan.vehicle_value_at_origination),
        format!("{:.0}", loan.estimated_annual_distance_km),
        loan.distance_source.as_ref().to_string(),
        loan.annual_fuel_consumption
            .map(|v| format!("{v:.2}"))
            .unwrap_or_default(),
        date(loan.origination_date),
        date(loan.reporting_date),
    ]
}

fn assessment_columns(loan: Option<&LoanRecord>) -> [String; 3] {
    loan.map_or_else(Default::default, |loan| {
        let assessment = assess_data_quality(loan);
        [
            assessment.option.to_string(),
            assessment.score.value().to_string(),
            assessment.drivers.join("; "),
        ]
    })
}
