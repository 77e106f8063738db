//! Precondition checks run before any arithmetic.
//!
//! Checks run in a fixed order and stop at the first failure:
//! required fields, then monetary values, then factor lookup.

use pcaf_factors::{EmissionFactor, FactorTable};
use pcaf_loan_models::LoanRecord;

use crate::{CalculationError, MonetaryField, RequiredField};

/// Validates `loan` against `table` and returns the matched factor.
///
/// # Errors
///
/// * [`CalculationError::MissingRequiredField`] if the loan ID, vehicle type,
///   or fuel type is absent (every absent field is listed).
/// * [`CalculationError::InvalidMonetaryValue`] if the outstanding balance or
///   vehicle value is not strictly positive.
/// * [`CalculationError::NoMatchingEmissionFactor`] if no table row matches.
pub fn validate<'a>(
    loan: &LoanRecord,
    table: &'a FactorTable,
) -> Result<&'a EmissionFactor, CalculationError> {
    let mut missing = Vec::new();
    if loan.loan_id.trim().is_empty() {
        missing.push(RequiredField::LoanId);
    }
    if loan.vehicle_type.is_none() {
        missing.push(RequiredField::VehicleType);
    }
    if loan.fuel_type.is_none() {
        missing.push(RequiredField::FuelType);
    }

    let (Some(vehicle_type), Some(fuel_type)) = (loan.vehicle_type, loan.fuel_type) else {
        return Err(CalculationError::MissingRequiredField { fields: missing });
    };
    if !missing.is_empty() {
        return Err(CalculationError::MissingRequiredField { fields: missing });
    }

    check_positive(MonetaryField::OutstandingBalance, loan.outstanding_balance)?;
    check_positive(
        MonetaryField::VehicleValueAtOrigination,
        loan.vehicle_value_at_origination,
    )?;

    table
        .find_factor(vehicle_type, fuel_type, &loan.engine_size_class)
        .ok_or_else(|| CalculationError::NoMatchingEmissionFactor {
            vehicle_type,
            fuel_type,
            engine_size_class: loan.engine_size_class.clone(),
        })
}

// `!(value > 0.0)` also rejects NaN.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
fn check_positive(field: MonetaryField, value: f64) -> Result<(), CalculationError> {
    if !(value > 0.0) {
        return Err(CalculationError::InvalidMonetaryValue { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pcaf_vehicle_models::{DataQualityScore, EngineSizeClass, FuelType, VehicleType};

    use super::*;

    fn table() -> FactorTable {
        FactorTable::new(vec![EmissionFactor {
            vehicle_type: VehicleType::PassengerCar,
            fuel_type: FuelType::Gasoline,
            engine_size_class: EngineSizeClass::new("1.5-2.0L"),
            factor_kg_co2_per_km: 0.15,
            data_quality_tier: DataQualityScore::EstimatedProxy,
            source: "fixture".to_string(),
            pcaf_data_option: None,
            geographic_scope: None,
        }])
    }

    fn valid_loan() -> LoanRecord {
        LoanRecord::new("MVL-1", 17_500.0, 24_000.0)
            .with_vehicle(VehicleType::PassengerCar, FuelType::Gasoline)
            .with_engine_size("1.5-2.0L")
    }

    #[test]
    fn valid_loan_returns_factor() {
        let table = table();
        let factor = validate(&valid_loan(), &table).unwrap();
        assert_eq!(factor.source, "fixture");
    }

    #[test]
    fn lists_every_missing_field() {
        let loan = LoanRecord::new("  ", 17_500.0, 24_000.0);
        let err = validate(&loan, &table()).unwrap_err();
        assert_eq!(
            err,
            CalculationError::MissingRequiredField {
                fields: vec![
                    RequiredField::LoanId,
                    RequiredField::VehicleType,
                    RequiredField::FuelType,
                ],
            }
        );
    }

    #[test]
    fn blank_loan_id_alone_is_missing() {
        let mut loan = valid_loan();
        loan.loan_id = String::new();
        let err = validate(&loan, &table()).unwrap_err();
        assert_eq!(
            err,
            CalculationError::MissingRequiredField {
                fields: vec![RequiredField::LoanId],
            }
        );
    }

    #[test]
    fn missing_fields_checked_before_monetary_values() {
        let mut loan = valid_loan();
        loan.fuel_type = None;
        loan.outstanding_balance = -5.0;
        let err = validate(&loan, &table()).unwrap_err();
        assert!(matches!(err, CalculationError::MissingRequiredField { .. }));
    }

    #[test]
    fn rejects_zero_outstanding_balance() {
        let mut loan = valid_loan();
        loan.outstanding_balance = 0.0;
        let err = validate(&loan, &table()).unwrap_err();
        assert!(matches!(
            err,
            CalculationError::InvalidMonetaryValue {
                field: MonetaryField::OutstandingBalance,
                ..
            }
        ));
    }

    #[test]
    fn rejects_negative_vehicle_value() {
        let mut loan = valid_loan();
        loan.vehicle_value_at_origination = -1.0;
        let err = validate(&loan, &table()).unwrap_err();
        assert!(matches!(
            err,
            CalculationError::InvalidMonetaryValue {
                field: MonetaryField::VehicleValueAtOrigination,
                ..
            }
        ));
    }

    #[test]
    fn rejects_nan_balance() {
        let mut loan = valid_loan();
        loan.outstanding_balance = f64::NAN;
        assert!(matches!(
            validate(&loan, &table()),
            Err(CalculationError::InvalidMonetaryValue { .. })
        ));
    }

    #[test]
    fn monetary_values_checked_before_factor_lookup() {
        let mut loan = valid_loan().with_vehicle(VehicleType::Motorcycle, FuelType::Diesel);
        loan.vehicle_value_at_origination = 0.0;
        assert!(matches!(
            validate(&loan, &table()),
            Err(CalculationError::InvalidMonetaryValue { .. })
        ));
    }

    #[test]
    fn unmatched_engine_class_is_no_factor() {
        let loan = valid_loan().with_engine_size("2.0L+");
        let err = validate(&loan, &table()).unwrap_err();
        assert!(matches!(err, CalculationError::NoMatchingEmissionFactor { .. }));
    }
}
