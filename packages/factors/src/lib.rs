#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! PCAF emission factor tables and exact-match factor lookup.
//!
//! A [`FactorTable`] is an ordered list of [`EmissionFactor`] rows. It is
//! built once (from the seeded tables in [`registry`], from an override
//! TOML file, or directly in code for tests) and then passed explicitly to
//! the calculator. There is no global factor cache.

pub mod registry;

use std::path::Path;

use pcaf_vehicle_models::{DataQualityScore, EngineSizeClass, FuelType, PcafDataOption, VehicleType};
use serde::{Deserialize, Serialize};

/// Errors that can occur while loading a factor table.
#[derive(Debug, thiserror::Error)]
pub enum FactorTableError {
    /// The factor file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The factor file is not valid TOML or has the wrong shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A row failed validation.
    #[error("Invalid factor at row {index}: {reason}")]
    InvalidFactor {
        /// Zero-based row index across the table.
        index: usize,
        /// What was wrong with the row.
        reason: String,
    },
}

/// One lookup row: the tailpipe factor for a vehicle/fuel/engine class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactor {
    /// Vehicle category this row applies to.
    pub vehicle_type: VehicleType,
    /// Fuel type this row applies to.
    pub fuel_type: FuelType,
    /// Engine size bucket, or the `"all"` wildcard.
    pub engine_size_class: EngineSizeClass,
    /// Kilograms of CO2 per kilometre driven.
    pub factor_kg_co2_per_km: f64,
    /// PCAF data quality tier of this factor.
    pub data_quality_tier: DataQualityScore,
    /// Provenance label shown in audit trails and reports.
    pub source: String,
    /// PCAF data option the factor corresponds to.
    pub pcaf_data_option: Option<PcafDataOption>,
    /// Geography the factor was derived for.
    pub geographic_scope: Option<String>,
}

/// Unvalidated factor row as it appears in a TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct FactorRow {
    vehicle_type: VehicleType,
    fuel_type: FuelType,
    #[serde(default)]
    engine_size_class: EngineSizeClass,
    factor_kg_co2_per_km: f64,
    data_quality_tier: u8,
    source: String,
    #[serde(default)]
    pcaf_data_option: Option<PcafDataOption>,
    #[serde(default)]
    geographic_scope: Option<String>,
}

impl FactorRow {
    fn validate(self, index: usize) -> Result<EmissionFactor, FactorTableError> {
        if !self.factor_kg_co2_per_km.is_finite() || self.factor_kg_co2_per_km <= 0.0 {
            return Err(FactorTableError::InvalidFactor {
                index,
                reason: format!(
                    "factor_kg_co2_per_km must be positive, got {}",
                    self.factor_kg_co2_per_km
                ),
            });
        }

        let data_quality_tier = DataQualityScore::from_value(self.data_quality_tier)
            .map_err(|e| FactorTableError::InvalidFactor {
                index,
                reason: e.to_string(),
            })?;

        Ok(EmissionFactor {
            vehicle_type: self.vehicle_type,
            fuel_type: self.fuel_type,
            engine_size_class: self.engine_size_class,
            factor_kg_co2_per_km: self.factor_kg_co2_per_km,
            data_quality_tier,
            source: self.source,
            pcaf_data_option: self.pcaf_data_option,
            geographic_scope: self.geographic_scope,
        })
    }
}

/// Ordered emission factor lookup table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactorTable {
    factors: Vec<EmissionFactor>,
}

impl FactorTable {
    /// Wraps an explicit list of rows. Row order is lookup priority.
    #[must_use]
    pub const fn new(factors: Vec<EmissionFactor>) -> Self {
        Self { factors }
    }

    /// The seeded PCAF reference table.
    #[must_use]
    pub fn pcaf_defaults() -> Self {
        Self::new(registry::seeded_factors())
    }

    /// Parses a table from a factor TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`FactorTableError`] if the document fails to parse or any
    /// row fails validation.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, FactorTableError> {
        let file = registry::parse_factor_toml(toml_str)?;
        Ok(Self::new(file.into_factors(0)?))
    }

    /// Reads and parses a table from a factor TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`FactorTableError`] if the file cannot be read, fails to
    /// parse, or any row fails validation.
    pub fn from_path(path: &Path) -> Result<Self, FactorTableError> {
        let contents = std::fs::read_to_string(path)?;
        let table = Self::from_toml_str(&contents)?;
        log::info!(
            "Loaded {} emission factor(s) from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Finds the first row matching the vehicle and fuel type exactly whose
    /// engine class equals `engine_size_class` or is the `"all"` wildcard.
    #[must_use]
    pub fn find_factor(
        &self,
        vehicle_type: VehicleType,
        fuel_type: FuelType,
        engine_size_class: &EngineSizeClass,
    ) -> Option<&EmissionFactor> {
        self.factors.iter().find(|f| {
            f.vehicle_type == vehicle_type
                && f.fuel_type == fuel_type
                && (f.engine_size_class == *engine_size_class || f.engine_size_class.is_wildcard())
        })
    }

    /// All rows, in lookup order.
    #[must_use]
    pub fn factors(&self) -> &[EmissionFactor] {
        &self.factors
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}
