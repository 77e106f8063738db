//! Runtime configuration from flags and environment.
//!
//! Flags take precedence over environment variables.

use std::path::PathBuf;

use pcaf_factors::{FactorTable, FactorTableError};

/// Environment variable naming a factor table TOML file.
pub const FACTORS_FILE_ENV: &str = "PCAF_FACTORS_FILE";

/// Resolved settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding `results.duckdb`.
    pub data_dir: PathBuf,
    /// Factor table override. `None` uses the built-in PCAF defaults.
    pub factors_file: Option<PathBuf>,
}

impl Config {
    /// Resolves configuration from CLI flags and the process environment.
    #[must_use]
    pub fn resolve(data_dir: Option<PathBuf>, factors_file: Option<PathBuf>) -> Self {
        Self::resolve_with(
            data_dir,
            factors_file,
            pcaf_store::paths::data_dir(),
            std::env::var(FACTORS_FILE_ENV).ok(),
        )
    }

    fn resolve_with(
        data_dir: Option<PathBuf>,
        factors_file: Option<PathBuf>,
        env_data_dir: PathBuf,
        env_factors_file: Option<String>,
    ) -> Self {
        Self {
            data_dir: data_dir.unwrap_or(env_data_dir),
            factors_file: factors_file.or_else(|| {
                env_factors_file
                    .filter(|s| !s.trim().is_empty())
                    .map(PathBuf::from)
            }),
        }
    }

    /// Path of the results database.
    #[must_use]
    pub fn results_db_path(&self) -> PathBuf {
        pcaf_store::paths::results_db_path(&self.data_dir)
    }

    /// Loads the active factor table.
    ///
    /// # Errors
    ///
    /// Returns [`FactorTableError`] if the override file cannot be read or
    /// parsed.
    pub fn factor_table(&self) -> Result<FactorTable, FactorTableError> {
        self.factors_file
            .as_deref()
            .map_or_else(|| Ok(FactorTable::pcaf_defaults()), FactorTable::from_path)
    }
}
