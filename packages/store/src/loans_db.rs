//! Latest loan inputs, one row per loan ID.
//!
//! Saving a loan that already exists replaces the stored row.

use std::str::FromStr;

use chrono::NaiveDate;
use duckdb::Connection;
use pcaf_loan_models::{DistanceSource, LoanRecord};
use pcaf_vehicle_models::{EngineSizeClass, FuelType, VehicleType};

use crate::StoreError;

pub(crate) fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS loans (
            loan_id TEXT NOT NULL PRIMARY KEY,
            loan_amount DOUBLE NOT NULL,
            outstanding_balance DOUBLE NOT NULL,
            vehicle_type TEXT,
            fuel_type TEXT,
            engine_size_class TEXT NOT NULL,
            vehicle_make TEXT,
            vehicle_model TEXT,
            vehicle_value_at_origination DOUBLE NOT NULL,
            estimated_annual_distance_km DOUBLE NOT NULL,
            distance_source TEXT NOT NULL DEFAULT 'unknown',
            annual_fuel_consumption DOUBLE,
            origination_date DATE,
            reporting_date DATE,
            updated_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP
        );",
    )?;
    Ok(())
}

/// Inserts or replaces `loans`, keyed by loan ID.
///
/// Returns the number of rows written.
///
/// # Errors
///
/// Returns [`StoreError`] if an upsert fails.
pub fn upsert_loans(conn: &Connection, loans: &[LoanRecord]) -> Result<u64, StoreError> {
    if loans.is_empty() {
        return Ok(0);
    }

    let mut stmt = conn.prepare(
        "INSERT INTO loans (
            loan_id, loan_amount, outstanding_balance, vehicle_type, fuel_type,
            engine_size_class, vehicle_make, vehicle_model,
            vehicle_value_at_origination, estimated_annual_distance_km,
            distance_source, annual_fuel_consumption,
            origination_date, reporting_date
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (loan_id) DO UPDATE SET
            loan_amount = EXCLUDED.loan_amount,
            outstanding_balance = EXCLUDED.outstanding_balance,
            vehicle_type = EXCLUDED.vehicle_type,
            fuel_type = EXCLUDED.fuel_type,
            engine_size_class = EXCLUDED.engine_size_class,
            vehicle_make = EXCLUDED.vehicle_make,
            vehicle_model = EXCLUDED.vehicle_model,
            vehicle_value_at_origination = EXCLUDED.vehicle_value_at_origination,
            estimated_annual_distance_km = EXCLUDED.estimated_annual_distance_km,
            distance_source = EXCLUDED.distance_source,
            annual_fuel_consumption = EXCLUDED.annual_fuel_consumption,
            origination_date = EXCLUDED.origination_date,
            reporting_date = EXCLUDED.reporting_date,
            updated_at = now()",
    )?;

    let mut written = 0u64;
    for loan in loans {
        let vehicle_type = loan.vehicle_type.map(|v| v.as_ref().to_string());
        let fuel_type = loan.fuel_type.map(|f| f.as_ref().to_string());
        let origination = loan.origination_date.map(format_date);
        let reporting = loan.reporting_date.map(format_date);

        let rows = stmt.execute(duckdb::params![
            loan.loan_id,
            loan.loan_amount,
            loan.outstanding_balance,
            vehicle_type,
            fuel_type,
            loan.engine_size_class.as_str(),
            loan.vehicle_make,
            loan.vehicle_model,
            loan.vehicle_value_at_origination,
            loan.estimated_annual_distance_km,
            loan.distance_source.as_ref(),
            loan.annual_fuel_consumption,
            origination,
            reporting,
        ])?;
        written += u64::try_from(rows).unwrap_or(0);
    }

    log::debug!("Saved {written} loan record(s)");
    Ok(written)
}

/// Returns every stored loan, ordered by loan ID.
///
/// # Errors
///
/// Returns [`StoreError`] if the query fails or a stored category is not
/// recognized.
pub fn load_loans(conn: &Connection) -> Result<Vec<LoanRecord>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT loan_id, loan_amount, outstanding_balance, vehicle_type, fuel_type,
                engine_size_class, vehicle_make, vehicle_model,
                vehicle_value_at_origination, estimated_annual_distance_km,
                distance_source, annual_fuel_consumption,
                origination_date::TEXT, reporting_date::TEXT
         FROM loans
         ORDER BY loan_id",
    )?;
    stmt.raw_execute()?;

    let mut loans = Vec::new();
    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next()? {
        let vehicle_type: Option<String> = row.get(3)?;
        let fuel_type: Option<String> = row.get(4)?;
        let engine_size_class: String = row.get(5)?;
        let distance_source: String = row.get(10)?;
        let origination_date: Option<String> = row.get(12)?;
        let reporting_date: Option<String> = row.get(13)?;

        loans.push(LoanRecord {
            loan_id: row.get(0)?,
            loan_amount: row.get(1)?,
            outstanding_balance: row.get(2)?,
            vehicle_type: parse_stored::<VehicleType>(vehicle_type.as_deref())?,
            fuel_type: parse_stored::<FuelType>(fuel_type.as_deref())?,
            engine_size_class: EngineSizeClass::from(engine_size_class),
            vehicle_make: row.get(6)?,
            vehicle_model: row.get(7)?,
            vehicle_value_at_origination: row.get(8)?,
            estimated_annual_distance_km: row.get(9)?,
            distance_source: parse_stored::<DistanceSource>(Some(&distance_source))?
                .unwrap_or_default(),
            annual_fuel_consumption: row.get(11)?,
            origination_date: parse_stored_date(origination_date.as_deref())?,
            reporting_date: parse_stored_date(reporting_date.as_deref())?,
        });
    }

    Ok(loans)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_stored<T: FromStr>(value: Option<&str>) -> Result<Option<T>, StoreError> {
    value
        .map(|v| {
            T::from_str(v).map_err(|_| StoreError::Conversion {
                message: format!("unrecognized stored category '{v}'"),
            })
        })
        .transpose()
}

fn parse_stored_date(value: Option<&str>) -> Result<Option<NaiveDate>, StoreError> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d").map_err(|e| StoreError::Conversion {
                message: format!("invalid stored date '{v}': {e}"),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::open_in_memory;

    fn car(id: &str, balance: f64) -> LoanRecord {
        LoanRecord::new(id, balance, 24_000.0)
            .with_vehicle(VehicleType::PassengerCar, FuelType::Gasoline)
            .with_engine_size("1.5-2.0L")
            .with_dates(
                NaiveDate::from_ymd_opt(2023, 4, 12),
                NaiveDate::from_ymd_opt(2023, 12, 31),
            )
    }

    #[test]
    fn round_trips_every_field() {
        let conn = open_in_memory();
        let loan = LoanRecord {
            loan_amount: 25_000.0,
            annual_fuel_consumption: Some(640.5),
            ..car("MVL-1", 17_500.0)
                .with_distance_km(12_000.0)
                .with_make_model("Honda", "Civic")
                .with_distance_source(DistanceSource::Primary)
        };
        upsert_loans(&conn, std::slice::from_ref(&loan)).unwrap();

        assert_eq!(load_loans(&conn).unwrap(), vec![loan]);
    }

    #[test]
    fn keeps_missing_categories_and_dates() {
        let conn = open_in_memory();
        let loan = LoanRecord::new("BARE", 1_000.0, 2_000.0);
        upsert_loans(&conn, std::slice::from_ref(&loan)).unwrap();

        let loaded = load_loans(&conn).unwrap();
        assert_eq!(loaded[0].vehicle_type, None);
        assert_eq!(loaded[0].origination_date, None);
        assert_eq!(loaded[0].vehicle_make, None);
        assert_eq!(loaded[0].distance_source, DistanceSource::Unknown);
        assert!(loaded[0].engine_size_class.is_wildcard());
    }

    #[test]
    fn saving_again_replaces_the_row() {
        let conn = open_in_memory();
        upsert_loans(&conn, &[car("A", 10_000.0), car("B", 5_000.0)]).unwrap();
        upsert_loans(&conn, &[car("A", 8_000.0)]).unwrap();

        let loaded = load_loans(&conn).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].loan_id, "A");
        assert!((loaded[0].outstanding_balance - 8_000.0).abs() < f64::EPSILON);
    }
}
