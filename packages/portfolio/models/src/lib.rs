#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Portfolio-level financed-emissions summary types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aggregated PCAF metrics for a set of calculated loans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    /// Number of calculated loans.
    pub total_loans: u64,
    /// Sum of original loan principal.
    pub total_loan_value: f64,
    /// Sum of outstanding balances.
    pub total_outstanding_balance: f64,
    /// Sum of financed emissions, in tCO2e.
    pub total_financed_emissions_tco2e: f64,
    /// PCAF Box 8 weighted data quality score (outstanding-balance weighted).
    pub weighted_data_quality_score: f64,
    /// Financed kg CO2e per unit of outstanding balance.
    pub emission_intensity_kg_per_currency: f64,
    /// Mean attribution factor across loans.
    pub average_attribution_factor: f64,
    /// Loans scored 3 or better.
    pub pcaf_compliant_loans: u64,
    /// Financed tCO2e per fuel type.
    pub emissions_by_fuel_type: BTreeMap<String, f64>,
    /// Financed tCO2e per vehicle type.
    pub emissions_by_vehicle_type: BTreeMap<String, f64>,
    /// Loan count per data quality score (1-5).
    pub loans_by_data_quality: BTreeMap<u8, u64>,
    /// Loan count per assessed PCAF data option (`1a` to `3b`).
    #[serde(default)]
    pub loans_by_pcaf_option: BTreeMap<String, u64>,
    /// Portfolio-level data collection advice.
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl PortfolioSummary {
    /// Share of loans that are PCAF compliant, as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pcaf_compliant_percentage(&self) -> f64 {
        if self.total_loans == 0 {
            return 0.0;
        }
        self.pcaf_compliant_loans as f64 / self.total_loans as f64 * 100.0
    }

    /// Share of loans scored 4 or 5, as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn low_quality_percentage(&self) -> f64 {
        if self.total_loans == 0 {
            return 0.0;
        }
        let low: u64 = self
            .loans_by_data_quality
            .iter()
            .filter(|(score, _)| **score >= 4)
            .map(|(_, count)| count)
            .sum();
        low as f64 / self.total_loans as f64 * 100.0
    }

    /// Share of total financed emissions represented by `emissions`, as a
    /// percentage.
    #[must_use]
    pub fn emissions_share(&self, emissions: f64) -> f64 {
        if self.total_financed_emissions_tco2e.abs() < f64::EPSILON {
            return 0.0;
        }
        emissions / self.total_financed_emissions_tco2e * 100.0
    }
}

/// Qualitative band for a weighted data quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQualityBand {
    /// Score ≤ 1.5
    Excellent,
    /// Score ≤ 2.5
    Good,
    /// Score ≤ 3.5
    Fair,
    /// Score ≤ 4.5
    Poor,
    /// Anything higher
    VeryPoor,
}

impl DataQualityBand {
    /// Buckets a (possibly fractional) weighted score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score <= 1.5 {
            Self::Excellent
        } else if score <= 2.5 {
            Self::Good
        } else if score <= 3.5 {
            Self::Fair
        } else if score <= 4.5 {
            Self::Poor
        } else {
            Self::VeryPoor
        }
    }
}

impl std::fmt::Display for DataQualityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "Excellent (Level 1)"),
            Self::Good => write!(f, "Good (Level 2)"),
            Self::Fair => write!(f, "Fair (Level 3)"),
            Self::Poor => write!(f, "Poor (Level 4)"),
            Self::VeryPoor => write!(f, "Very Poor (Level 5)"),
        }
    }
}
