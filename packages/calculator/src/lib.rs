#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! PCAF motor vehicle financed-emissions calculator.
//!
//! For one loan:
//!
//! ```text
//! attribution        = outstanding balance / vehicle value at origination
//! annual emissions   = annual km * factor (kg CO2/km) / 1000      [tCO2e]
//! financed emissions = annual emissions * attribution * temporal attribution
//! ```
//!
//! The factor table is passed in explicitly, so every calculation is a pure
//! function of its inputs. Validation ([`validation::validate`]) runs first
//! and a calculation either returns a complete [`CalculationResult`] or a
//! single [`CalculationError`].

pub mod amortization;
pub mod attribution;
pub mod batch;
pub mod data_quality;
pub mod progress;
pub mod temporal;
pub mod validation;

use pcaf_factors::FactorTable;
use pcaf_loan_models::{CalculationResult, LoanRecord};
use pcaf_vehicle_models::{EngineSizeClass, FuelType, VehicleType};

pub use attribution::attribution_factor;
pub use batch::{BatchOutcome, LoanFailure, calculate_batch};
pub use data_quality::{DataQualityAssessment, assess_data_quality};
pub use temporal::temporal_attribution;
pub use validation::validate;

/// A loan field that must be present before calculating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    /// `loanId`
    LoanId,
    /// `vehicleType`
    VehicleType,
    /// `fuelType`
    FuelType,
}

impl std::fmt::Display for RequiredField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoanId => write!(f, "loan ID"),
            Self::VehicleType => write!(f, "vehicle type"),
            Self::FuelType => write!(f, "fuel type"),
        }
    }
}

/// A monetary loan field that must be strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonetaryField {
    /// `outstandingBalance`
    OutstandingBalance,
    /// `vehicleValueAtOrigination`
    VehicleValueAtOrigination,
}

impl std::fmt::Display for MonetaryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutstandingBalance => write!(f, "outstanding balance"),
            Self::VehicleValueAtOrigination => write!(f, "vehicle value at origination"),
        }
    }
}

/// Reasons a loan cannot be calculated. All are deterministic input
/// problems: correct the loan and resubmit.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalculationError {
    /// One or more identity/category fields are absent.
    #[error("Missing required field(s): {}", join_fields(fields))]
    MissingRequiredField {
        /// Every absent field, in check order.
        fields: Vec<RequiredField>,
    },

    /// A monetary field is zero, negative, or not a number.
    #[error("Invalid {field}: {value} (must be greater than 0)")]
    InvalidMonetaryValue {
        /// The offending field.
        field: MonetaryField,
        /// The rejected value.
        value: f64,
    },

    /// No emission factor row matches the vehicle/fuel/engine combination.
    #[error(
        "No matching emission factor for {vehicle_type} / {fuel_type} / engine size {engine_size_class}"
    )]
    NoMatchingEmissionFactor {
        /// Vehicle type looked up.
        vehicle_type: VehicleType,
        /// Fuel type looked up.
        fuel_type: FuelType,
        /// Engine class looked up.
        engine_size_class: EngineSizeClass,
    },
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Calculates PCAF financed emissions for one loan.
///
/// # Errors
///
/// Returns the first failed precondition as a [`CalculationError`]; see
/// [`validate`] for the check order. Nothing is computed when validation
/// fails.
pub fn calculate_financed_emissions(
    loan: &LoanRecord,
    table: &FactorTable,
) -> Result<CalculationResult, CalculationError> {
    let factor = validate(loan, table)?;

    let attribution =
        attribution_factor(loan.outstanding_balance, loan.vehicle_value_at_origination);
    let annual_emissions =
        loan.estimated_annual_distance_km * factor.factor_kg_co2_per_km / 1000.0;
    let temporal = temporal_attribution(loan.origination_date, loan.reporting_date);
    let financed_emissions = annual_emissions * attribution * temporal;
    let data_quality_score = factor.data_quality_tier;

    log::trace!(
        "{}: attribution={attribution:.4} annual={annual_emissions:.4}t temporal={temporal:.4} financed={financed_emissions:.4}t (factor {} kg/km, {})",
        loan.loan_id,
        factor.factor_kg_co2_per_km,
        factor.source,
    );

    Ok(CalculationResult {
        loan_id: loan.loan_id.clone(),
        attribution_factor: attribution,
        annual_emissions_tco2e: annual_emissions,
        temporal_attribution: temporal,
        financed_emissions_tco2e: financed_emissions,
        data_quality_score,
        pcaf_compliant: data_quality_score.is_pcaf_compliant(),
        emission_factor_kg_co2_per_km: factor.factor_kg_co2_per_km,
        emission_factor_source: factor.source.clone(),
        emission_factor_data_option: factor.pcaf_data_option,
        emission_factor_geographic_scope: factor.geographic_scope.clone(),
    })
}
