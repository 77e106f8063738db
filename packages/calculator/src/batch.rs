//! Bulk calculation over an uploaded portfolio.
//!
//! Each loan is calculated independently against the same factor table.
//! A failing loan is recorded and skipped; it never stops the batch.

use pcaf_factors::FactorTable;
use pcaf_loan_models::{CalculationResult, LoanRecord};

use crate::progress::ProgressCallback;
use crate::{CalculationError, calculate_financed_emissions};

/// A loan that could not be calculated.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanFailure {
    /// Loan ID as given (may be blank when that was the problem).
    pub loan_id: String,
    /// Why the calculation was rejected.
    pub error: CalculationError,
}

/// Results of a batch run, both in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    /// Successful calculations.
    pub results: Vec<CalculationResult>,
    /// Rejected loans.
    pub failures: Vec<LoanFailure>,
}

impl BatchOutcome {
    /// Whether every loan was calculated.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of loans processed.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.results.len() + self.failures.len()
    }

    /// Sum of financed emissions across successful results, in tCO2e.
    #[must_use]
    pub fn total_financed_emissions_tco2e(&self) -> f64 {
        self.results.iter().map(|r| r.financed_emissions_tco2e).sum()
    }
}

/// Calculates every loan in `loans`.
#[must_use]
pub fn calculate_batch(
    loans: &[LoanRecord],
    table: &FactorTable,
    progress: &dyn ProgressCallback,
) -> BatchOutcome {
    progress.set_total(loans.len() as u64);
    progress.set_message("Calculating financed emissions".to_string());

    let mut outcome = BatchOutcome::default();

    for loan in loans {
        match calculate_financed_emissions(loan, table) {
            Ok(result) => outcome.results.push(result),
            Err(error) => {
                log::warn!("Loan '{}' rejected: {error}", loan.loan_id);
                outcome.failures.push(LoanFailure {
                    loan_id: loan.loan_id.clone(),
                    error,
                });
            }
        }
        progress.inc(1);
    }

    log::info!(
        "Calculated {} of {} loan(s): {:.3} tCO2e financed",
        outcome.results.len(),
        loans.len(),
        outcome.total_financed_emissions_tco2e()
    );
    progress.finish(format!(
        "{} calculated, {} rejected",
        outcome.results.len(),
        outcome.failures.len()
    ));

    outcome
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use pcaf_factors::EmissionFactor;
    use pcaf_vehicle_models::{DataQualityScore, EngineSizeClass, FuelType, VehicleType};

    use super::*;
    use crate::progress::NullProgress;

    fn table() -> FactorTable {
        FactorTable::new(vec![EmissionFactor {
            vehicle_type: VehicleType::PassengerCar,
            fuel_type: FuelType::Hybrid,
            engine_size_class: EngineSizeClass::all(),
            factor_kg_co2_per_km: 0.08,
            data_quality_tier: DataQualityScore::EstimatedProxy,
            source: "ICCT 2023".to_string(),
            pcaf_data_option: None,
            geographic_scope: None,
        }])
    }

    fn hybrid(id: &str, balance: f64) -> LoanRecord {
        LoanRecord::new(id, balance, 30_000.0)
            .with_vehicle(VehicleType::PassengerCar, FuelType::Hybrid)
    }

    #[derive(Default)]
    struct CountingProgress {
        total: AtomicU64,
        done: AtomicU64,
    }

    impl ProgressCallback for CountingProgress {
        fn set_total(&self, total: u64) {
            self.total.store(total, Ordering::SeqCst);
        }
        fn inc(&self, delta: u64) {
            self.done.fetch_add(delta, Ordering::SeqCst);
        }
        fn set_message(&self, _msg: String) {}
        fn finish(&self, _msg: String) {}
    }

    #[test]
    fn failures_do_not_stop_the_batch() {
        let loans = vec![
            hybrid("A", 15_000.0),
            hybrid("B", 0.0),
            LoanRecord::new("C", 10_000.0, 20_000.0),
            hybrid("D", 30_000.0),
        ];
        let outcome = calculate_batch(&loans, &table(), &NullProgress);

        assert_eq!(outcome.processed(), 4);
        assert!(!outcome.is_success());
        let ok: Vec<&str> = outcome.results.iter().map(|r| r.loan_id.as_str()).collect();
        assert_eq!(ok, ["A", "D"]);
        let failed: Vec<&str> = outcome.failures.iter().map(|f| f.loan_id.as_str()).collect();
        assert_eq!(failed, ["B", "C"]);
        assert!(matches!(
            outcome.failures[0].error,
            CalculationError::InvalidMonetaryValue { .. }
        ));
        assert!(matches!(
            outcome.failures[1].error,
            CalculationError::MissingRequiredField { .. }
        ));
    }

    #[test]
    fn batch_matches_single_calculations() {
        let loans = vec![hybrid("A", 15_000.0), hybrid("B", 45_000.0)];
        let table = table();
        let outcome = calculate_batch(&loans, &table, &NullProgress);
        for (loan, result) in loans.iter().zip(&outcome.results) {
            assert_eq!(&calculate_financed_emissions(loan, &table).unwrap(), result);
        }
        // 15000 km * 0.08 / 1000 = 1.2 t; attributions 0.5 and 1.5.
        assert!((outcome.total_financed_emissions_tco2e() - 2.4).abs() < 1e-9);
    }

    #[test]
    fn reports_progress_per_loan() {
        let loans = vec![hybrid("A", 1.0), hybrid("B", 2.0), hybrid("C", 3.0)];
        let progress = CountingProgress::default();
        let _ = calculate_batch(&loans, &table(), &progress);
        assert_eq!(progress.total.load(Ordering::SeqCst), 3);
        assert_eq!(progress.done.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn empty_batch_is_success() {
        let outcome = calculate_batch(&[], &table(), &NullProgress);
        assert!(outcome.is_success());
        assert_eq!(outcome.processed(), 0);
    }
}
