//! PCAF data option assessment for a single loan.
//!
//! The option (1a through 3b) follows from which inputs the lender holds:
//!
//! | Option | Inputs |
//! |--------|--------|
//! | 1a | make and model, measured fuel or energy use |
//! | 1b | make and model, actual distance |
//! | 2a | make and model, local statistical distance |
//! | 2b | make and model, regional statistical distance |
//! | 3a | vehicle type, statistical distance |
//! | 3b | anything less |
//!
//! The option sets a starting score which is then downgraded for missing
//! dates or an assumed distance. This score describes the loan's inputs.
//! It is separate from [`CalculationResult::data_quality_score`], which
//! comes from the emission factor row.
//!
//! [`CalculationResult::data_quality_score`]: pcaf_loan_models::CalculationResult

use pcaf_loan_models::{DEFAULT_ANNUAL_DISTANCE_KM, DistanceSource, LoanRecord};
use pcaf_vehicle_models::{DataQualityScore, PcafDataOption};

/// Outcome of assessing which PCAF data option a loan supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataQualityAssessment {
    /// Best option the loan's inputs support.
    pub option: PcafDataOption,
    /// Option score after downgrades.
    pub score: DataQualityScore,
    /// Facts about the inputs that decided the option and score.
    pub drivers: Vec<String>,
    /// Data to collect to reach a better option or score.
    pub recommendations: Vec<String>,
}

impl DataQualityAssessment {
    /// Whether the assessed score meets the PCAF reporting bar.
    #[must_use]
    pub const fn is_pcaf_compliant(&self) -> bool {
        self.score.is_pcaf_compliant()
    }
}

/// Determines the PCAF data option for `loan` from the inputs it carries.
#[must_use]
pub fn assess_data_quality(loan: &LoanRecord) -> DataQualityAssessment {
    let has_make_model = loan.has_make_model();
    let has_consumption = loan
        .annual_fuel_consumption
        .is_some_and(|v| v.is_finite() && v > 0.0);
    let has_actual_distance = loan.distance_source == DistanceSource::Primary;
    let has_dates = loan.origination_date.is_some() && loan.reporting_date.is_some();

    let mut drivers = Vec::new();
    let option = if has_make_model && has_consumption {
        drivers.push("Measured fuel consumption available".to_string());
        drivers.push("Vehicle make and model known".to_string());
        PcafDataOption::Option1a
    } else if has_make_model && has_actual_distance {
        drivers.push("Vehicle make and model known".to_string());
        drivers.push("Actual distance travelled available".to_string());
        PcafDataOption::Option1b
    } else if has_make_model && loan.distance_source == DistanceSource::LocalStatistical {
        drivers.push("Vehicle make and model known".to_string());
        drivers.push("Local statistical distance used".to_string());
        PcafDataOption::Option2a
    } else if has_make_model && loan.distance_source == DistanceSource::RegionalStatistical {
        drivers.push("Vehicle make and model known".to_string());
        drivers.push("Regional statistical distance used".to_string());
        PcafDataOption::Option2b
    } else if loan.vehicle_type.is_some() && loan.distance_source.is_statistical() {
        drivers.push("Vehicle type known, make and model unknown".to_string());
        drivers.push("Statistical distance used".to_string());
        PcafDataOption::Option3a
    } else {
        drivers.push("Average vehicle assumptions used".to_string());
        PcafDataOption::Option3b
    };

    let mut score = option.default_score();

    if !has_dates {
        score = score.max(DataQualityScore::EstimatedAverage);
        drivers.push("Temporal attribution limited: origination or reporting date missing".to_string());
    }

    let assumed_distance = !has_actual_distance
        && (loan.estimated_annual_distance_km - DEFAULT_ANNUAL_DISTANCE_KM).abs() < f64::EPSILON;
    if assumed_distance {
        score = score.max(DataQualityScore::EstimatedProxy);
        drivers.push(format!(
            "Default distance assumed ({DEFAULT_ANNUAL_DISTANCE_KM:.0} km/year)"
        ));
    }

    let recommendations = recommendations(loan, option, has_make_model, assumed_distance);

    log::debug!(
        "{}: PCAF option {option}, score {}",
        loan.loan_id,
        score.value()
    );

    DataQualityAssessment {
        option,
        score,
        drivers,
        recommendations,
    }
}

fn recommendations(
    loan: &LoanRecord,
    option: PcafDataOption,
    has_make_model: bool,
    assumed_distance: bool,
) -> Vec<String> {
    let mut out = Vec::new();

    if option == PcafDataOption::Option3b {
        if loan.vehicle_type.is_none() {
            out.push("Collect the vehicle type to reach option 3a".to_string());
        } else if !loan.distance_source.is_statistical() {
            out.push("Record the statistical distance source to reach option 3a".to_string());
        }
    }
    if !has_make_model {
        out.push("Collect vehicle make and model to reach option 2a or 2b".to_string());
    }
    if loan.origination_date.is_none() {
        out.push("Add the loan origination date for temporal attribution".to_string());
    }
    if assumed_distance {
        out.push("Collect actual distance travelled to improve data quality".to_string());
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pcaf_vehicle_models::{FuelType, VehicleType};

    use super::*;

    fn dated(loan: LoanRecord) -> LoanRecord {
        loan.with_dates(
            NaiveDate::from_ymd_opt(2023, 1, 15),
            NaiveDate::from_ymd_opt(2023, 12, 31),
        )
    }

    fn car() -> LoanRecord {
        dated(
            LoanRecord::new("A", 20_000.0, 30_000.0)
                .with_vehicle(VehicleType::PassengerCar, FuelType::Gasoline)
                .with_distance_km(12_000.0),
        )
    }

    #[test]
    fn measured_consumption_with_make_model_is_1a() {
        let loan = LoanRecord {
            annual_fuel_consumption: Some(900.0),
            ..car().with_make_model("Toyota", "Camry")
        };
        let assessment = assess_data_quality(&loan);
        assert_eq!(assessment.option, PcafDataOption::Option1a);
        assert_eq!(assessment.score, DataQualityScore::VerifiedActual);
        assert!(assessment.is_pcaf_compliant());
        assert!(assessment.recommendations.is_empty());
    }

    #[test]
    fn actual_distance_with_make_model_is_1b() {
        let loan = car()
            .with_make_model("Tesla", "Model 3")
            .with_distance_source(DistanceSource::Primary);
        assert_eq!(assess_data_quality(&loan).option, PcafDataOption::Option1b);
    }

    #[test]
    fn statistical_distance_picks_2a_or_2b() {
        let local = car()
            .with_make_model("Ford", "F-150")
            .with_distance_source(DistanceSource::LocalStatistical);
        let regional = local
            .clone()
            .with_distance_source(DistanceSource::RegionalStatistical);

        let local = assess_data_quality(&local);
        assert_eq!(local.option, PcafDataOption::Option2a);
        assert_eq!(local.score, DataQualityScore::PartiallyVerified);
        assert_eq!(
            assess_data_quality(&regional).option,
            PcafDataOption::Option2b
        );
    }

    #[test]
    fn vehicle_type_with_statistical_distance_is_3a() {
        let loan = car().with_distance_source(DistanceSource::RegionalStatistical);
        let assessment = assess_data_quality(&loan);
        assert_eq!(assessment.option, PcafDataOption::Option3a);
        assert_eq!(assessment.score, DataQualityScore::EstimatedProxy);
        assert!(assessment
            .recommendations
            .iter()
            .any(|r| r.contains("make and model")));
    }

    #[test]
    fn bare_loan_falls_back_to_3b() {
        let loan = LoanRecord::new("BARE", 1_000.0, 2_000.0);
        let assessment = assess_data_quality(&loan);

        assert_eq!(assessment.option, PcafDataOption::Option3b);
        assert_eq!(assessment.score, DataQualityScore::EstimatedAverage);
        assert!(!assessment.is_pcaf_compliant());
        assert!(assessment.drivers.iter().any(|d| d.contains("Temporal")));
        assert!(assessment.drivers.iter().any(|d| d.contains("15000 km/year")));
        assert_eq!(
            assessment.recommendations[0],
            "Collect the vehicle type to reach option 3a"
        );
    }

    #[test]
    fn missing_dates_downgrade_a_good_option() {
        let loan = car()
            .with_make_model("Toyota", "Camry")
            .with_distance_source(DistanceSource::Primary)
            .with_dates(None, NaiveDate::from_ymd_opt(2023, 12, 31));
        let assessment = assess_data_quality(&loan);
        assert_eq!(assessment.option, PcafDataOption::Option1b);
        assert_eq!(assessment.score, DataQualityScore::EstimatedAverage);
    }

    #[test]
    fn default_distance_caps_score_at_three() {
        let loan = car()
            .with_make_model("Toyota", "Camry")
            .with_distance_source(DistanceSource::LocalStatistical)
            .with_distance_km(DEFAULT_ANNUAL_DISTANCE_KM);
        let assessment = assess_data_quality(&loan);
        assert_eq!(assessment.option, PcafDataOption::Option2a);
        assert_eq!(assessment.score, DataQualityScore::EstimatedProxy);
    }

    #[test]
    fn default_distance_reported_as_actual_is_not_downgraded() {
        let loan = car()
            .with_make_model("Toyota", "Camry")
            .with_distance_source(DistanceSource::Primary)
            .with_distance_km(DEFAULT_ANNUAL_DISTANCE_KM);
        assert_eq!(
            assess_data_quality(&loan).score,
            DataQualityScore::VerifiedActual
        );
    }
}
