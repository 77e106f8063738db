//! Seeded PCAF emission factors.
//!
//! One TOML file per vehicle group lives in `packages/factors/factors/` and
//! is embedded with [`include_str!`]. Rows keep file order, then list order,
//! because lookup returns the first match.

use serde::Deserialize;

use crate::{EmissionFactor, FactorTableError};

/// TOML tables embedded at compile time.
const FACTOR_TOMLS: &[(&str, &str)] = &[
    ("passenger_car", include_str!("../factors/passenger_car.toml")),
    ("motorcycle", include_str!("../factors/motorcycle.toml")),
    ("commercial", include_str!("../factors/commercial.toml")),
    ("specialty", include_str!("../factors/specialty.toml")),
];

/// Total number of seeded factor rows (used in tests).
#[cfg(test)]
const EXPECTED_FACTOR_COUNT: usize = 13;

/// One factor file: a named group of rows.
#[derive(Debug, Clone, Deserialize)]
pub struct FactorFile {
    /// Identifier of this group (e.g., `"passenger_car"`).
    #[serde(default)]
    pub id: String,
    /// Display name of this group.
    #[serde(default)]
    pub name: String,
    /// Raw factor rows, validated by [`FactorFile::into_factors`].
    #[serde(default)]
    pub factors: Vec<crate::FactorRow>,
}

impl FactorFile {
    /// Validates every row, numbering rows from `offset` in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`FactorTableError::InvalidFactor`] for the first row with a
    /// non-positive factor or an out-of-range data quality tier.
    pub fn into_factors(self, offset: usize) -> Result<Vec<EmissionFactor>, FactorTableError> {
        self.factors
            .into_iter()
            .enumerate()
            .map(|(i, row)| row.validate(offset + i))
            .collect()
    }
}

/// Parses a factor TOML document.
///
/// # Errors
///
/// Returns [`FactorTableError::Parse`] if the document is not valid TOML or
/// does not match the factor file layout.
pub fn parse_factor_toml(toml_str: &str) -> Result<FactorFile, FactorTableError> {
    toml::de::from_str(toml_str).map_err(|e| FactorTableError::Parse(e.to_string()))
}

/// Returns every seeded factor row, in file order.
///
/// # Panics
///
/// Panics if any embedded TOML is malformed (this is a compile-time guarantee
/// since the files are embedded).
#[must_use]
pub fn seeded_factors() -> Vec<EmissionFactor> {
    let mut factors = Vec::new();
    for (name, toml) in FACTOR_TOMLS {
        let file =
            parse_factor_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"));
        let rows = file
            .into_factors(factors.len())
            .unwrap_or_else(|e| panic!("Invalid factor in {name}.toml: {e}"));
        factors.extend(rows);
    }
    factors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_all_seeded_factors() {
        assert_eq!(seeded_factors().len(), EXPECTED_FACTOR_COUNT);
    }

    #[test]
    fn seeded_keys_are_unique() {
        let factors = seeded_factors();
        let mut keys: Vec<String> = factors
            .iter()
            .map(|f| {
                format!(
                    "{}/{}/{}",
                    f.vehicle_type, f.fuel_type, f.engine_size_class
                )
            })
            .collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), EXPECTED_FACTOR_COUNT);
    }

    #[test]
    fn all_seeded_factors_have_provenance() {
        for factor in &seeded_factors() {
            assert!(!factor.source.is_empty(), "factor source is empty");
            assert!(factor.factor_kg_co2_per_km > 0.0);
            assert!(factor.pcaf_data_option.is_some());
        }
    }

    #[test]
    fn file_ids_match_registry_names() {
        for (name, toml) in FACTOR_TOMLS {
            let file = parse_factor_toml(toml).unwrap();
            assert_eq!(file.id, *name);
            assert!(!file.name.is_empty());
        }
    }
}
