//! Command implementations shared by the subcommands and the interactive
//! menu.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use pcaf_calculator::amortization::generate_schedule;
use pcaf_calculator::{assess_data_quality, attribution_factor, calculate_financed_emissions};
use pcaf_cli_utils::{IndicatifProgress, MultiProgress};
use pcaf_factors::{EmissionFactor, FactorTable};
use pcaf_ingest::parsing::{parse_category, parse_date};
use pcaf_loan_models::{CalculationResult, DEFAULT_ANNUAL_DISTANCE_KM, DistanceSource, LoanRecord};
use pcaf_report::ReportContext;
use pcaf_store::{SavedCounts, loans_db, results_db};
use pcaf_vehicle_models::{EngineSizeClass, FuelType, VehicleType};

use crate::config::Config;

/// Inputs for a single-loan calculation.
#[derive(Debug, Clone, Args)]
pub struct CalculateArgs {
    /// Loan identifier
    #[arg(long)]
    pub loan_id: String,
    /// Outstanding balance at the reporting date
    #[arg(long)]
    pub outstanding_balance: f64,
    /// Vehicle value when the loan was originated
    #[arg(long)]
    pub vehicle_value: f64,
    /// Vehicle type (e.g., `passenger_car`)
    #[arg(long, value_parser = parse_vehicle_type)]
    pub vehicle_type: VehicleType,
    /// Fuel type (e.g., `gasoline`)
    #[arg(long, value_parser = parse_fuel_type)]
    pub fuel_type: FuelType,
    /// Engine size class (e.g., `1.5-2.0L`)
    #[arg(long, default_value = "all")]
    pub engine_size: String,
    /// Vehicle make (e.g., `Toyota`)
    #[arg(long, requires = "model")]
    pub make: Option<String>,
    /// Vehicle model (e.g., `Camry`)
    #[arg(long, requires = "make")]
    pub model: Option<String>,
    /// Estimated annual distance in km
    #[arg(long, default_value_t = DEFAULT_ANNUAL_DISTANCE_KM)]
    pub distance_km: f64,
    /// Where the annual distance comes from (`primary`,
    /// `local_statistical`, `regional_statistical`)
    #[arg(long, value_parser = parse_distance_source, default_value = "unknown")]
    pub distance_source: DistanceSource,
    /// Measured annual fuel or energy consumption
    #[arg(long)]
    pub fuel_consumption: Option<f64>,
    /// Original loan principal
    #[arg(long, default_value_t = 0.0)]
    pub loan_amount: f64,
    /// Origination date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub origination_date: Option<NaiveDate>,
    /// Reporting date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub reporting_date: Option<NaiveDate>,
    /// Store the loan and result in the results database
    #[arg(long)]
    pub save: bool,
}

impl CalculateArgs {
    /// Builds the loan record these arguments describe.
    #[must_use]
    pub fn to_loan(&self) -> LoanRecord {
        LoanRecord {
            loan_amount: self.loan_amount,
            vehicle_make: self.make.clone(),
            vehicle_model: self.model.clone(),
            annual_fuel_consumption: self.fuel_consumption,
            ..LoanRecord::new(
                self.loan_id.clone(),
                self.outstanding_balance,
                self.vehicle_value,
            )
            .with_vehicle(self.vehicle_type, self.fuel_type)
            .with_engine_size(EngineSizeClass::new(&self.engine_size))
            .with_distance_km(self.distance_km)
            .with_distance_source(self.distance_source)
            .with_dates(self.origination_date, self.reporting_date)
        }
    }
}

/// Inputs for an amortization schedule.
#[derive(Debug, Clone, Args)]
pub struct ScheduleArgs {
    /// Amount borrowed
    #[arg(long)]
    pub principal: f64,
    /// Annual interest rate in percent (e.g., `5.5`)
    #[arg(long)]
    pub rate: f64,
    /// Term in months
    #[arg(long)]
    pub term_months: u32,
    /// Origination date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub origination_date: NaiveDate,
    /// Date to report the outstanding balance for (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub as_of: Option<NaiveDate>,
    /// Vehicle value at origination, to derive the attribution factor at
    /// `--as-of`
    #[arg(long, requires = "as_of")]
    pub vehicle_value: Option<f64>,
    /// Print every payment instead of the summary only
    #[arg(long)]
    pub full: bool,
}

/// Output format for the portfolio summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    /// Plain-text disclosure
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

fn parse_vehicle_type(raw: &str) -> Result<VehicleType, String> {
    parse_category(raw, "vehicle type")?.ok_or_else(|| "vehicle type is required".to_string())
}

fn parse_fuel_type(raw: &str) -> Result<FuelType, String> {
    parse_category(raw, "fuel type")?.ok_or_else(|| "fuel type is required".to_string())
}

fn parse_distance_source(raw: &str) -> Result<DistanceSource, String> {
    Ok(parse_category(raw, "distance source")?.unwrap_or_default())
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw)?.ok_or_else(|| "date is empty".to_string())
}

/// Calculates one loan, prints the result, and optionally stores it.
///
/// # Errors
///
/// Returns an error if the factor table cannot be loaded, the loan is
/// rejected, or storing fails.
pub fn calculate(
    config: &Config,
    loan: &LoanRecord,
    save: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = config.factor_table()?;
    let result = calculate_financed_emissions(loan, &table)?;

    print_result(loan, &result);

    if save {
        save_batch(config, std::slice::from_ref(loan), std::slice::from_ref(&result))?;
        println!("Saved to {}", config.results_db_path().display());
    }

    Ok(())
}

/// Ingests a loan CSV, calculates every loan, and stores the successes.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the factor table cannot be
/// loaded, or storing fails. Individual bad rows and rejected loans are
/// reported, not returned.
pub fn batch(
    config: &Config,
    multi: &MultiProgress,
    csv_path: &Path,
    save: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = config.factor_table()?;
    let ingest = pcaf_ingest::parse_loans_file(csv_path)?;

    for error in &ingest.row_errors {
        println!("Skipped {error}");
    }

    let progress = IndicatifProgress::batch_bar(multi, "Calculating financed emissions");
    let outcome = pcaf_calculator::calculate_batch(&ingest.loans, &table, progress.as_ref());

    for failure in &outcome.failures {
        println!("Rejected {}: {}", display_id(&failure.loan_id), failure.error);
    }

    let summary = pcaf_portfolio::summarize(&ingest.loans, &outcome.results);
    println!();
    println!(
        "{} loan(s) read, {} row(s) skipped, {} calculated, {} rejected",
        ingest.loans.len(),
        ingest.row_errors.len(),
        outcome.results.len(),
        outcome.failures.len()
    );
    println!(
        "Financed emissions: {:.3} tCO2e (WDQS {:.2}, {})",
        summary.total_financed_emissions_tco2e,
        summary.weighted_data_quality_score,
        pcaf_portfolio::data_quality_label(summary.weighted_data_quality_score)
    );

    if save && !outcome.results.is_empty() {
        let result_ids: BTreeSet<&str> =
            outcome.results.iter().map(|r| r.loan_id.as_str()).collect();
        let calculated: Vec<LoanRecord> = ingest
            .loans
            .iter()
            .filter(|l| result_ids.contains(l.loan_id.as_str()))
            .cloned()
            .collect();
        save_batch(config, &calculated, &outcome.results)?;
        println!("Saved to {}", config.results_db_path().display());
    }

    Ok(())
}

/// Stores `loans` and `results` in one transaction.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or any write fails,
/// in which case nothing is stored.
pub fn save_batch(
    config: &Config,
    loans: &[LoanRecord],
    results: &[CalculationResult],
) -> Result<SavedCounts, Box<dyn std::error::Error>> {
    let conn = pcaf_store::open(&config.results_db_path())?;
    let counts = pcaf_store::save_calculations(&conn, loans, results)?;
    log::info!(
        "Saved {} loan(s) and {} result(s)",
        counts.loans,
        counts.results
    );
    Ok(counts)
}

/// Prints an amortization schedule and, with `--as-of`, the balance and
/// attribution factor on that date.
///
/// # Errors
///
/// Returns an error if the loan terms are invalid.
pub fn schedule(args: &ScheduleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let schedule = generate_schedule(
        args.principal,
        args.rate / 100.0,
        args.term_months,
        args.origination_date,
    )?;

    println!("Monthly payment:  {:.2}", schedule.monthly_payment);
    println!("Payments:         {}", schedule.payments.len());
    println!("Total interest:   {:.2}", schedule.total_interest());

    if args.full {
        println!();
        println!(
            "{:>4} {:<12} {:>12} {:>12} {:>12} {:>14}",
            "NO", "DATE", "PAYMENT", "PRINCIPAL", "INTEREST", "BALANCE"
        );
        println!("{}", "-".repeat(71));
        for p in &schedule.payments {
            println!(
                "{:>4} {:<12} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
                p.number,
                p.date.to_string(),
                p.amount,
                p.principal,
                p.interest,
                p.remaining_balance
            );
        }
    }

    if let Some(as_of) = args.as_of {
        let balance = schedule.balance_as_of(as_of);
        println!();
        println!("Balance on {as_of}: {balance:.2}");
        if let Some(value) = args.vehicle_value {
            println!(
                "Attribution factor: {:.4}",
                attribution_factor(balance, value)
            );
        }
    }

    Ok(())
}

/// Prints the active factor table.
///
/// # Errors
///
/// Returns an error if the factor table cannot be loaded.
pub fn factors(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let table = config.factor_table()?;
    print_factors(&table);
    Ok(())
}

/// Prints a summary of the latest stored results.
///
/// # Errors
///
/// Returns an error if the database cannot be read or rendering fails.
pub fn summary(
    config: &Config,
    format: SummaryFormat,
    context: &ReportContext,
) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pcaf_store::open(&config.results_db_path())?;
    let loans = loans_db::load_loans(&conn)?;
    let results = results_db::latest_results(&conn)?;

    if results.is_empty() {
        log::warn!("No stored results in {}", config.results_db_path().display());
    }

    let summary = pcaf_portfolio::summarize(&loans, &results);
    match format {
        SummaryFormat::Text => print!("{}", pcaf_report::render_text_summary(context, &summary)),
        SummaryFormat::Json => println!("{}", pcaf_report::render_json_summary(&summary)?),
    }

    Ok(())
}

/// Writes the loan-level CSV of the latest stored results to `out`.
///
/// # Errors
///
/// Returns an error if the database cannot be read or the file cannot be
/// written.
pub fn export(config: &Config, out: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pcaf_store::open(&config.results_db_path())?;
    let loans = loans_db::load_loans(&conn)?;
    let results = results_db::latest_results(&conn)?;

    if let Some(parent) = out.parent() {
        pcaf_store::paths::ensure_dir(parent)?;
    }
    let file = std::fs::File::create(out)?;
    let written = pcaf_report::write_loan_csv(file, &loans, &results)?;

    log::info!("Exported {written} loan(s) to {}", out.display());
    println!("Exported {written} loan(s) to {}", out.display());
    Ok(())
}

/// Prints the stored calculation history for one loan.
///
/// # Errors
///
/// Returns an error if the database cannot be read.
pub fn history(config: &Config, loan_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pcaf_store::open(&config.results_db_path())?;
    let history = results_db::history(&conn, loan_id)?;

    if history.is_empty() {
        println!("No stored results for {loan_id}");
        return Ok(());
    }

    println!("{:<6} {:<26} {:>14} {:>8}", "SEQ", "RECORDED", "FINANCED tCO2e", "QUALITY");
    println!("{}", "-".repeat(57));
    for entry in &history {
        let recorded = entry
            .recorded_at
            .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string());
        println!(
            "{:<6} {recorded:<26} {:>14.4} {:>8}",
            entry.seq,
            entry.result.financed_emissions_tco2e,
            entry.result.data_quality_score.value()
        );
    }

    Ok(())
}

fn print_result(loan: &LoanRecord, result: &CalculationResult) {
    println!("Loan:                  {}", result.loan_id);
    println!("Attribution factor:    {:.4}", result.attribution_factor);
    println!("Annual emissions:      {:.4} tCO2e", result.annual_emissions_tco2e);
    println!("Temporal attribution:  {:.4}", result.temporal_attribution);
    println!("Financed emissions:    {:.4} tCO2e", result.financed_emissions_tco2e);
    println!(
        "Data quality score:    {} ({})",
        result.data_quality_score.value(),
        result.data_quality_score.label()
    );
    println!(
        "PCAF compliant:        {}",
        if result.pcaf_compliant { "yes" } else { "no" }
    );
    println!(
        "Emission factor:       {} kg CO2/km ({})",
        result.emission_factor_kg_co2_per_km, result.emission_factor_source
    );
    println!(
        "Factor PCAF option:    {} ({})",
        optional(result.emission_factor_data_option.map(|o| o.to_string())),
        optional(result.emission_factor_geographic_scope.clone())
    );

    let assessment = assess_data_quality(loan);
    println!();
    println!(
        "Input data option:     {} - {}",
        assessment.option,
        assessment.option.name()
    );
    println!(
        "Input data quality:    {} ({})",
        assessment.score.value(),
        assessment.score.label()
    );
    for driver in &assessment.drivers {
        println!("  * {driver}");
    }
    if !assessment.recommendations.is_empty() {
        println!("Recommendations:");
        for recommendation in &assessment.recommendations {
            println!("  - {recommendation}");
        }
    }
}

fn print_factors(table: &FactorTable) {
    println!(
        "{:<28} {:<12} {:<12} {:>10} {:>4} {:>4}  {:<16} SOURCE",
        "VEHICLE", "FUEL", "ENGINE", "KG CO2/KM", "DQ", "OPT", "SCOPE"
    );
    println!("{}", "-".repeat(112));
    for factor in table.factors() {
        println!("{}", factor_line(factor));
    }
    println!();
    println!("{} factor(s)", table.len());
}

fn factor_line(factor: &EmissionFactor) -> String {
    format!(
        "{:<28} {:<12} {:<12} {:>10.3} {:>4} {:>4}  {:<16} {}",
        factor.vehicle_type.as_ref(),
        factor.fuel_type.as_ref(),
        factor.engine_size_class.as_str(),
        factor.factor_kg_co2_per_km,
        factor.data_quality_tier.value(),
        optional(factor.pcaf_data_option.map(|o| o.to_string())),
        optional(factor.geographic_scope.clone()),
        factor.source
    )
}

fn optional(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

fn display_id(loan_id: &str) -> &str {
    if loan_id.trim().is_empty() {
        "(no loan ID)"
    } else {
        loan_id
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;
    use indicatif::ProgressDrawTarget;

    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: CalculateArgs,
    }

    #[derive(Parser)]
    struct ScheduleHarness {
        #[command(flatten)]
        args: ScheduleArgs,
    }

    const LOANS_CSV: &str = "loan_id,outstanding_balance,vehicle_type,fuel_type,engine_size,vehicle_value\n\
                             A,10000,passenger_car,gasoline,1.5-2.0L,20000\n\
                             B,15000,passenger_car,electric,,30000\n\
                             C,5000,,diesel,,9000\n\
                             A,30000,passenger_car,electric,,40000\n";

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn scratch_config(dir: &Path) -> Config {
        Config {
            data_dir: dir.join("data"),
            factors_file: None,
        }
    }

    fn hidden_multi() -> MultiProgress {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn gasoline_car(id: &str) -> LoanRecord {
        LoanRecord::new(id, 10_000.0, 20_000.0)
            .with_vehicle(VehicleType::PassengerCar, FuelType::Gasoline)
            .with_engine_size("1.5-2.0L")
    }

    #[test]
    fn batch_saves_then_summary_and_export_read_back() {
        let dir = scratch_dir("pcaf_cli_batch_round");
        let config = scratch_config(&dir);
        let csv_path = dir.join("loans.csv");
        std::fs::write(&csv_path, LOANS_CSV).unwrap();

        batch(&config, &hidden_multi(), &csv_path, true).unwrap();

        {
            let conn = pcaf_store::open(&config.results_db_path()).unwrap();
            let loans = loans_db::load_loans(&conn).unwrap();
            let ids: Vec<&str> = loans.iter().map(|l| l.loan_id.as_str()).collect();
            // C is rejected by the calculator, the second A by ingest
            assert_eq!(ids, ["A", "B"]);
            assert_eq!(loans[0].fuel_type, Some(FuelType::Gasoline));
            assert_eq!(results_db::count(&conn).unwrap(), 2);
        }

        summary(
            &config,
            SummaryFormat::Json,
            &ReportContext::new(None, "2023"),
        )
        .unwrap();

        let out = dir.join("export").join("loans.csv");
        export(&config, &out).unwrap();

        let text = std::fs::read_to_string(&out).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("loan_id,loan_amount,"));
        let rows: Vec<&str> = lines.collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("A,"));
        assert!(rows[1].starts_with("B,"));
    }

    #[test]
    fn batch_without_save_leaves_no_database() {
        let dir = scratch_dir("pcaf_cli_batch_no_save");
        let config = scratch_config(&dir);
        let csv_path = dir.join("loans.csv");
        std::fs::write(&csv_path, LOANS_CSV).unwrap();

        batch(&config, &hidden_multi(), &csv_path, false).unwrap();
        assert!(!config.results_db_path().exists());
    }

    #[test]
    fn failed_save_leaves_the_store_untouched() {
        let dir = scratch_dir("pcaf_cli_atomic_save");
        let config = scratch_config(&dir);
        let table = FactorTable::pcaf_defaults();
        let loans = vec![gasoline_car("A"), gasoline_car("B")];

        let good = calculate_financed_emissions(&loans[0], &table).unwrap();
        let bad = CalculationResult {
            loan_id: "B".to_string(),
            temporal_attribution: 1.5,
            ..good.clone()
        };
        assert!(save_batch(&config, &loans, &[good.clone(), bad]).is_err());

        {
            let conn = pcaf_store::open(&config.results_db_path()).unwrap();
            assert!(loans_db::load_loans(&conn).unwrap().is_empty());
            assert_eq!(results_db::count(&conn).unwrap(), 0);
        }

        let counts = save_batch(&config, &loans[..1], &[good]).unwrap();
        assert_eq!(counts, SavedCounts { loans: 1, results: 1 });
    }

    #[test]
    fn schedule_prints_for_valid_terms() {
        let harness = ScheduleHarness::try_parse_from([
            "pcaf",
            "--principal",
            "35000",
            "--rate",
            "5.5",
            "--term-months",
            "60",
            "--origination-date",
            "2023-01-15",
            "--as-of",
            "2023-12-31",
            "--vehicle-value",
            "40000",
        ])
        .unwrap();
        assert!(schedule(&harness.args).is_ok());

        let zero_term = ScheduleArgs {
            term_months: 0,
            ..harness.args
        };
        assert!(schedule(&zero_term).is_err());
    }

    #[test]
    fn vehicle_value_needs_an_as_of_date() {
        let parsed = ScheduleHarness::try_parse_from([
            "pcaf",
            "--principal",
            "1000",
            "--rate",
            "0",
            "--term-months",
            "12",
            "--origination-date",
            "2023-01-01",
            "--vehicle-value",
            "2000",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn calculate_args_carry_make_model_and_distance_source() {
        let harness = Harness::try_parse_from([
            "pcaf",
            "--loan-id",
            "MVL-2",
            "--outstanding-balance",
            "17500",
            "--vehicle-value",
            "24000",
            "--vehicle-type",
            "passenger_car",
            "--fuel-type",
            "electric",
            "--make",
            "Tesla",
            "--model",
            "Model 3",
            "--distance-source",
            "primary",
            "--fuel-consumption",
            "2600",
        ])
        .unwrap();

        let loan = harness.args.to_loan();
        assert_eq!(loan.vehicle_make.as_deref(), Some("Tesla"));
        assert_eq!(loan.vehicle_model.as_deref(), Some("Model 3"));
        assert_eq!(loan.distance_source, DistanceSource::Primary);
        assert_eq!(loan.annual_fuel_consumption, Some(2600.0));
    }

    #[test]
    fn make_without_model_is_rejected() {
        let parsed = Harness::try_parse_from([
            "pcaf",
            "--loan-id",
            "X",
            "--outstanding-balance",
            "1",
            "--vehicle-value",
            "1",
            "--vehicle-type",
            "passenger_car",
            "--fuel-type",
            "gasoline",
            "--make",
            "Toyota",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn calculate_args_build_a_loan() {
        let harness = Harness::try_parse_from([
            "pcaf",
            "--loan-id",
            "MVL-1",
            "--outstanding-balance",
            "17500",
            "--vehicle-value",
            "24000",
            "--vehicle-type",
            "Passenger Car",
            "--fuel-type",
            "gasoline",
            "--engine-size",
            "1.5-2.0L",
            "--reporting-date",
            "2023-12-31",
        ])
        .unwrap();

        let loan = harness.args.to_loan();
        assert_eq!(loan.loan_id, "MVL-1");
        assert_eq!(loan.vehicle_type, Some(VehicleType::PassengerCar));
        assert_eq!(loan.fuel_type, Some(FuelType::Gasoline));
        assert_eq!(loan.engine_size_class.as_str(), "1.5-2.0L");
        assert!((loan.estimated_annual_distance_km - DEFAULT_ANNUAL_DISTANCE_KM).abs() < f64::EPSILON);
        assert_eq!(loan.origination_date, None);
        assert_eq!(loan.reporting_date, NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(loan.distance_source, DistanceSource::Unknown);
        assert_eq!(loan.vehicle_make, None);
        assert!(!harness.args.save);
    }

    #[test]
    fn unknown_fuel_type_is_rejected() {
        let parsed = Harness::try_parse_from([
            "pcaf",
            "--loan-id",
            "X",
            "--outstanding-balance",
            "1",
            "--vehicle-value",
            "1",
            "--vehicle-type",
            "bus",
            "--fuel-type",
            "coal",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn factor_listing_shows_option_and_scope() {
        let table = FactorTable::pcaf_defaults();
        let factor = table
            .find_factor(
                VehicleType::PassengerCar,
                FuelType::Electric,
                &EngineSizeClass::all(),
            )
            .unwrap();
        let line = factor_line(factor);
        let columns: Vec<&str> = line.split_whitespace().collect();
        assert_eq!(&columns[..7], ["passenger_car", "electric", "all", "0.050", "4", "3b", "global_average"]);

        let bare = EmissionFactor {
            pcaf_data_option: None,
            geographic_scope: None,
            ..factor.clone()
        };
        let columns: Vec<String> = factor_line(&bare)
            .split_whitespace()
            .map(str::to_string)
            .collect();
        assert_eq!(columns[5], "-");
        assert_eq!(columns[6], "-");
    }

    #[test]
    fn blank_loan_id_is_displayed() {
        assert_eq!(display_id(" "), "(no loan ID)");
        assert_eq!(display_id("A"), "A");
    }
}
