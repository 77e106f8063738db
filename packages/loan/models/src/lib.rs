#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Motor vehicle loan records and financed-emissions calculation results.
//!
//! A [`LoanRecord`] is the input to a PCAF calculation and a
//! [`CalculationResult`] is its output. Both are plain values: a record is
//! never mutated by a calculation, and a result is never mutated after it
//! is produced.

use chrono::NaiveDate;
use pcaf_vehicle_models::{
    DataQualityScore, EngineSizeClass, FuelType, PcafDataOption, VehicleType,
};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Annual distance assumed when a loan does not record one (regional
/// average, km/year).
pub const DEFAULT_ANNUAL_DISTANCE_KM: f64 = 15_000.0;

const fn default_annual_distance_km() -> f64 {
    DEFAULT_ANNUAL_DISTANCE_KM
}

/// Where a loan's annual distance figure comes from.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DistanceSource {
    /// Odometer readings or borrower-reported actual distance
    Primary,
    /// Local (city or state) statistical average
    LocalStatistical,
    /// Regional or national statistical average
    RegionalStatistical,
    /// Not recorded
    #[default]
    Unknown,
}

impl DistanceSource {
    /// Whether the distance is a statistical average rather than actual.
    #[must_use]
    pub const fn is_statistical(self) -> bool {
        matches!(self, Self::LocalStatistical | Self::RegionalStatistical)
    }
}

/// One motor vehicle loan being assessed.
///
/// `vehicle_type` and `fuel_type` are optional so that an upload row with a
/// blank category can still be represented and rejected by the calculator
/// with a precise error. A blank `loan_id` is treated the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRecord {
    /// Unique loan identifier.
    pub loan_id: String,
    /// Original loan principal.
    #[serde(default)]
    pub loan_amount: f64,
    /// Balance outstanding at the reporting date.
    pub outstanding_balance: f64,
    /// Financed vehicle category.
    pub vehicle_type: Option<VehicleType>,
    /// Financed vehicle fuel type.
    pub fuel_type: Option<FuelType>,
    /// Engine size bucket (`"all"` when unknown).
    #[serde(default)]
    pub engine_size_class: EngineSizeClass,
    /// Vehicle manufacturer, when known.
    #[serde(default)]
    pub vehicle_make: Option<String>,
    /// Vehicle model, when known.
    #[serde(default)]
    pub vehicle_model: Option<String>,
    /// Vehicle value when the loan was originated.
    pub vehicle_value_at_origination: f64,
    /// Estimated distance driven per year, in kilometres.
    #[serde(default = "default_annual_distance_km")]
    pub estimated_annual_distance_km: f64,
    /// Provenance of `estimated_annual_distance_km`.
    #[serde(default)]
    pub distance_source: DistanceSource,
    /// Measured fuel (litres) or energy (kWh) used per year, when reported.
    #[serde(default)]
    pub annual_fuel_consumption: Option<f64>,
    /// Date the loan was originated.
    #[serde(default)]
    pub origination_date: Option<NaiveDate>,
    /// Reporting date the calculation is performed for.
    #[serde(default)]
    pub reporting_date: Option<NaiveDate>,
}

impl LoanRecord {
    /// Creates a record with the identity and monetary fields set and every
    /// other field at its default.
    #[must_use]
    pub fn new(
        loan_id: impl Into<String>,
        outstanding_balance: f64,
        vehicle_value_at_origination: f64,
    ) -> Self {
        Self {
            loan_id: loan_id.into(),
            outstanding_balance,
            vehicle_value_at_origination,
            ..Self::default()
        }
    }

    /// Sets the vehicle and fuel category.
    #[must_use]
    pub fn with_vehicle(mut self, vehicle_type: VehicleType, fuel_type: FuelType) -> Self {
        self.vehicle_type = Some(vehicle_type);
        self.fuel_type = Some(fuel_type);
        self
    }

    /// Sets the engine size bucket.
    #[must_use]
    pub fn with_engine_size(mut self, engine_size_class: impl Into<EngineSizeClass>) -> Self {
        self.engine_size_class = engine_size_class.into();
        self
    }

    /// Sets the vehicle make and model.
    #[must_use]
    pub fn with_make_model(mut self, make: impl Into<String>, model: impl Into<String>) -> Self {
        self.vehicle_make = Some(make.into());
        self.vehicle_model = Some(model.into());
        self
    }

    /// Sets where the annual distance comes from.
    #[must_use]
    pub const fn with_distance_source(mut self, source: DistanceSource) -> Self {
        self.distance_source = source;
        self
    }

    /// Whether both make and model are recorded and non-blank.
    #[must_use]
    pub fn has_make_model(&self) -> bool {
        let known = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        known(&self.vehicle_make) && known(&self.vehicle_model)
    }

    /// Sets the estimated annual distance.
    #[must_use]
    pub fn with_distance_km(mut self, km: f64) -> Self {
        self.estimated_annual_distance_km = km;
        self
    }

    /// Sets the origination and reporting dates.
    #[must_use]
    pub fn with_dates(
        mut self,
        origination_date: Option<NaiveDate>,
        reporting_date: Option<NaiveDate>,
    ) -> Self {
        self.origination_date = origination_date;
        self.reporting_date = reporting_date;
        self
    }
}

impl Default for LoanRecord {
    fn default() -> Self {
        Self {
            loan_id: String::new(),
            loan_amount: 0.0,
            outstanding_balance: 0.0,
            vehicle_type: None,
            fuel_type: None,
            engine_size_class: EngineSizeClass::all(),
            vehicle_make: None,
            vehicle_model: None,
            vehicle_value_at_origination: 0.0,
            estimated_annual_distance_km: DEFAULT_ANNUAL_DISTANCE_KM,
            distance_source: DistanceSource::Unknown,
            annual_fuel_consumption: None,
            origination_date: None,
            reporting_date: None,
        }
    }
}

/// Financed-emissions figures derived for one loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    /// Loan the result belongs to.
    pub loan_id: String,
    /// Outstanding balance divided by vehicle value (not capped at 1).
    pub attribution_factor: f64,
    /// Whole-vehicle emissions for a year, in tCO2e.
    pub annual_emissions_tco2e: f64,
    /// Share of the reporting year the loan was outstanding, 0-1.
    pub temporal_attribution: f64,
    /// Emissions attributed to the lender, in tCO2e.
    pub financed_emissions_tco2e: f64,
    /// PCAF score of the emission factor used.
    pub data_quality_score: DataQualityScore,
    /// Whether `data_quality_score` is 3 or better.
    pub pcaf_compliant: bool,
    /// Emission factor applied, kg CO2 per km.
    pub emission_factor_kg_co2_per_km: f64,
    /// Provenance of the emission factor applied.
    pub emission_factor_source: String,
    /// PCAF data option the factor row was published for.
    #[serde(default)]
    pub emission_factor_data_option: Option<PcafDataOption>,
    /// Region the factor row applies to.
    #[serde(default)]
    pub emission_factor_geographic_scope: Option<String>,
}
