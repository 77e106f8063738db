#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Portfolio aggregation of PCAF financed-emissions results.
//!
//! Joins calculation results back to their loan records by loan ID and
//! rolls them up into a [`PortfolioSummary`]. The weighted data quality
//! score follows PCAF Box 8: each loan's score is weighted by its
//! outstanding balance, not by its emissions.

use std::collections::BTreeMap;

use pcaf_calculator::assess_data_quality;
use pcaf_loan_models::{CalculationResult, LoanRecord};
use pcaf_portfolio_models::PortfolioSummary;
use pcaf_vehicle_models::PCAF_COMPLIANT_MAX_SCORE;

pub use pcaf_portfolio_models::DataQualityBand;

/// Breakdown key used when a result has no matching loan record.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Compliance share below which the portfolio is flagged, in percent.
const COMPLIANT_SHARE_TARGET: f64 = 80.0;

/// Share of level 4-5 loans above which the portfolio is flagged, in percent.
const LOW_QUALITY_SHARE_LIMIT: f64 = 20.0;

/// Summarizes `results`, using `loans` for monetary totals and category
/// breakdowns.
///
/// Results whose loan ID has no entry in `loans` still count towards loan
/// totals and emissions, but contribute nothing to balances or the
/// weighted data quality score.
///
/// Each loan record's balance is counted at most once. When an ID repeats,
/// the n-th result for that ID is matched with the n-th loan carrying it;
/// results beyond the last such loan reuse its categories without adding
/// its balance again.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(loans: &[LoanRecord], results: &[CalculationResult]) -> PortfolioSummary {
    let mut by_id: BTreeMap<&str, Vec<&LoanRecord>> = BTreeMap::new();
    for loan in loans {
        by_id.entry(loan.loan_id.as_str()).or_default().push(loan);
    }
    let mut matched: BTreeMap<&str, usize> = BTreeMap::new();

    let mut summary = PortfolioSummary::default();
    let mut weighted_score_sum = 0.0;
    let mut attribution_sum = 0.0;

    for result in results {
        let id = result.loan_id.as_str();
        let candidates = by_id.get(id).map_or(&[][..], Vec::as_slice);
        let nth = matched.entry(id).or_insert(0);
        let (loan, first_use) = match candidates.get(*nth) {
            Some(loan) => (Some(*loan), true),
            None => (candidates.last().copied(), false),
        };
        *nth += 1;

        if loan.is_none() {
            log::debug!("No loan record for result '{id}'");
        } else if !first_use {
            log::warn!("Loan '{id}' has more results than records; balance counted once");
        }

        summary.total_loans += 1;
        summary.total_financed_emissions_tco2e += result.financed_emissions_tco2e;
        attribution_sum += result.attribution_factor;
        if result.pcaf_compliant {
            summary.pcaf_compliant_loans += 1;
        }
        *summary
            .loans_by_data_quality
            .entry(result.data_quality_score.value())
            .or_insert(0) += 1;

        let fuel_key = loan
            .and_then(|l| l.fuel_type)
            .map_or_else(|| UNKNOWN_CATEGORY.to_string(), |f| f.to_string());
        *summary.emissions_by_fuel_type.entry(fuel_key).or_insert(0.0) +=
            result.financed_emissions_tco2e;

        let vehicle_key = loan
            .and_then(|l| l.vehicle_type)
            .map_or_else(|| UNKNOWN_CATEGORY.to_string(), |v| v.to_string());
        *summary
            .emissions_by_vehicle_type
            .entry(vehicle_key)
            .or_insert(0.0) += result.financed_emissions_tco2e;

        let option_key = loan.map_or_else(
            || UNKNOWN_CATEGORY.to_string(),
            |l| assess_data_quality(l).option.to_string(),
        );
        *summary.loans_by_pcaf_option.entry(option_key).or_insert(0) += 1;

        if let Some(loan) = loan.filter(|_| first_use) {
            summary.total_loan_value += loan.loan_amount;
            summary.total_outstanding_balance += loan.outstanding_balance;
            weighted_score_sum +=
                f64::from(result.data_quality_score.value()) * loan.outstanding_balance;
        }
    }

    if summary.total_outstanding_balance > 0.0 {
        summary.weighted_data_quality_score =
            weighted_score_sum / summary.total_outstanding_balance;
        summary.emission_intensity_kg_per_currency =
            summary.total_financed_emissions_tco2e * 1000.0 / summary.total_outstanding_balance;
    }
    if summary.total_loans > 0 {
        summary.average_attribution_factor = attribution_sum / summary.total_loans as f64;
    }

    summary.recommendations = recommendations(&summary);
    summary
}

/// Portfolio-level advice for improving data quality.
#[must_use]
pub fn recommendations(summary: &PortfolioSummary) -> Vec<String> {
    if summary.total_loans == 0 {
        return vec!["No loans available for assessment".to_string()];
    }

    let mut out = Vec::new();
    if summary.weighted_data_quality_score > f64::from(PCAF_COMPLIANT_MAX_SCORE) {
        out.push(format!(
            "Weighted data quality score exceeds the PCAF threshold of {PCAF_COMPLIANT_MAX_SCORE}: improve data collection"
        ));
    }
    if summary.pcaf_compliant_percentage() < COMPLIANT_SHARE_TARGET {
        out.push(format!(
            "Fewer than {COMPLIANT_SHARE_TARGET:.0}% of loans are PCAF compliant: start a data quality improvement effort"
        ));
    }
    if summary.low_quality_percentage() > LOW_QUALITY_SHARE_LIMIT {
        out.push(format!(
            "More than {LOW_QUALITY_SHARE_LIMIT:.0}% of loans are at level 4 or 5: prioritize data collection for them"
        ));
    }
    out
}

/// Qualitative band for a weighted data quality score.
#[must_use]
pub fn data_quality_label(score: f64) -> DataQualityBand {
    DataQualityBand::from_score(score)
}

#[cfg(test)]
mod tests {
    use pcaf_loan_models::DistanceSource;
    use pcaf_vehicle_models::{DataQualityScore, FuelType, VehicleType};

    use super::*;

    fn loan(id: &str, amount: f64, balance: f64, fuel: FuelType) -> LoanRecord {
        LoanRecord {
            loan_amount: amount,
            ..LoanRecord::new(id, balance, 30_000.0).with_vehicle(VehicleType::PassengerCar, fuel)
        }
    }

    fn result(id: &str, financed: f64, attribution: f64, score: DataQualityScore) -> CalculationResult {
        CalculationResult {
            loan_id: id.to_string(),
            attribution_factor: attribution,
            annual_emissions_tco2e: financed / attribution,
            temporal_attribution: 1.0,
            financed_emissions_tco2e: financed,
            data_quality_score: score,
            pcaf_compliant: score.is_pcaf_compliant(),
            emission_factor_kg_co2_per_km: 0.1,
            emission_factor_source: "fixture".to_string(),
            emission_factor_data_option: None,
            emission_factor_geographic_scope: None,
        }
    }

    #[test]
    fn totals_and_breakdowns() {
        let loans = vec![
            loan("A", 40_000.0, 30_000.0, FuelType::Gasoline),
            loan("B", 20_000.0, 10_000.0, FuelType::Electric),
        ];
        let results = vec![
            result("A", 2.0, 1.0, DataQualityScore::EstimatedProxy),
            result("B", 0.5, 0.5, DataQualityScore::EstimatedAverage),
        ];

        let summary = summarize(&loans, &results);

        assert_eq!(summary.total_loans, 2);
        assert!((summary.total_loan_value - 60_000.0).abs() < 1e-9);
        assert!((summary.total_outstanding_balance - 40_000.0).abs() < 1e-9);
        assert!((summary.total_financed_emissions_tco2e - 2.5).abs() < 1e-12);
        assert_eq!(summary.pcaf_compliant_loans, 1);
        assert!((summary.average_attribution_factor - 0.75).abs() < 1e-12);
        assert!((summary.emissions_by_fuel_type["gasoline"] - 2.0).abs() < 1e-12);
        assert!((summary.emissions_by_fuel_type["electric"] - 0.5).abs() < 1e-12);
        assert!((summary.emissions_by_vehicle_type["passenger_car"] - 2.5).abs() < 1e-12);
        assert_eq!(summary.loans_by_data_quality[&3], 1);
        assert_eq!(summary.loans_by_data_quality[&4], 1);
    }

    #[test]
    fn weighted_score_is_balance_weighted() {
        let loans = vec![
            loan("A", 0.0, 30_000.0, FuelType::Gasoline),
            loan("B", 0.0, 10_000.0, FuelType::Electric),
        ];
        let results = vec![
            result("A", 1.0, 1.0, DataQualityScore::EstimatedProxy),
            result("B", 1.0, 1.0, DataQualityScore::VeryEstimated),
        ];

        let summary = summarize(&loans, &results);

        // (3 * 30000 + 5 * 10000) / 40000 = 3.5
        assert!((summary.weighted_data_quality_score - 3.5).abs() < 1e-12);
        assert_eq!(
            data_quality_label(summary.weighted_data_quality_score),
            DataQualityBand::Fair
        );
    }

    #[test]
    fn intensity_is_kg_per_unit_balance() {
        let loans = vec![loan("A", 0.0, 20_000.0, FuelType::Diesel)];
        let results = vec![result("A", 3.0, 1.0, DataQualityScore::EstimatedProxy)];
        let summary = summarize(&loans, &results);
        // 3 t * 1000 / 20000 = 0.15 kg per unit
        assert!((summary.emission_intensity_kg_per_currency - 0.15).abs() < 1e-12);
    }

    #[test]
    fn result_without_loan_counts_emissions_only() {
        let results = vec![result("ORPHAN", 1.2, 0.6, DataQualityScore::EstimatedProxy)];
        let summary = summarize(&[], &results);

        assert_eq!(summary.total_loans, 1);
        assert!((summary.total_financed_emissions_tco2e - 1.2).abs() < 1e-12);
        assert!(summary.total_outstanding_balance.abs() < f64::EPSILON);
        assert!(summary.weighted_data_quality_score.abs() < f64::EPSILON);
        assert!(summary.emission_intensity_kg_per_currency.abs() < f64::EPSILON);
        assert!((summary.emissions_by_fuel_type[UNKNOWN_CATEGORY] - 1.2).abs() < 1e-12);
    }

    #[test]
    fn empty_portfolio_is_zeroed() {
        let summary = summarize(&[], &[]);
        assert_eq!(
            summary,
            PortfolioSummary {
                recommendations: vec!["No loans available for assessment".to_string()],
                ..PortfolioSummary::default()
            }
        );
    }

    #[test]
    fn repeated_loan_id_counts_each_record_once() {
        let loans = vec![
            loan("A", 0.0, 10_000.0, FuelType::Gasoline),
            loan("A", 0.0, 30_000.0, FuelType::Electric),
        ];
        let results = vec![
            result("A", 1.0, 1.0, DataQualityScore::EstimatedProxy),
            result("A", 0.25, 1.0, DataQualityScore::EstimatedAverage),
        ];

        let summary = summarize(&loans, &results);

        assert!((summary.total_outstanding_balance - 40_000.0).abs() < 1e-9);
        assert!((summary.emissions_by_fuel_type["gasoline"] - 1.0).abs() < 1e-12);
        assert!((summary.emissions_by_fuel_type["electric"] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn extra_results_do_not_recount_the_balance() {
        let loans = vec![loan("A", 25_000.0, 10_000.0, FuelType::Gasoline)];
        let results = vec![
            result("A", 1.0, 1.0, DataQualityScore::EstimatedProxy),
            result("A", 2.0, 1.0, DataQualityScore::EstimatedProxy),
        ];

        let summary = summarize(&loans, &results);

        assert_eq!(summary.total_loans, 2);
        assert!((summary.total_outstanding_balance - 10_000.0).abs() < 1e-9);
        assert!((summary.total_loan_value - 25_000.0).abs() < 1e-9);
        assert!((summary.weighted_data_quality_score - 3.0).abs() < 1e-12);
        assert!((summary.emissions_by_fuel_type["gasoline"] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn counts_assessed_pcaf_options() {
        let loans = vec![
            loan("A", 0.0, 10_000.0, FuelType::Gasoline),
            loan("B", 0.0, 10_000.0, FuelType::Gasoline)
                .with_make_model("Toyota", "Camry")
                .with_distance_source(DistanceSource::LocalStatistical),
        ];
        let results = vec![
            result("A", 1.0, 1.0, DataQualityScore::EstimatedProxy),
            result("B", 1.0, 1.0, DataQualityScore::EstimatedProxy),
            result("ORPHAN", 1.0, 1.0, DataQualityScore::EstimatedProxy),
        ];

        let summary = summarize(&loans, &results);

        assert_eq!(summary.loans_by_pcaf_option["3b"], 1);
        assert_eq!(summary.loans_by_pcaf_option["2a"], 1);
        assert_eq!(summary.loans_by_pcaf_option[UNKNOWN_CATEGORY], 1);
    }

    #[test]
    fn weak_portfolio_gets_every_recommendation() {
        let loans = vec![loan("A", 0.0, 10_000.0, FuelType::Electric)];
        let results = vec![result("A", 0.5, 1.0, DataQualityScore::EstimatedAverage)];

        let advice = summarize(&loans, &results).recommendations;

        assert_eq!(advice.len(), 3);
        assert!(advice[0].starts_with("Weighted data quality score exceeds"));
    }

    #[test]
    fn compliant_portfolio_needs_no_advice() {
        let loans = vec![loan("A", 0.0, 10_000.0, FuelType::Gasoline)];
        let results = vec![result("A", 1.0, 1.0, DataQualityScore::EstimatedProxy)];
        assert!(summarize(&loans, &results).recommendations.is_empty());
    }
}
