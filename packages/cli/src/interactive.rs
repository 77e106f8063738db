//! Interactive menu for the PCAF toolchain.
//!
//! Provides a terminal UI using `dialoguer` for the same operations as the
//! subcommands, so a single loan can be calculated without memorizing
//! flags.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::NaiveDate;
use dialoguer::{Confirm, Input, Select};
use pcaf_cli_utils::MultiProgress;
use pcaf_factors::FactorTable;
use pcaf_ingest::parsing::parse_date;
use pcaf_loan_models::{DEFAULT_ANNUAL_DISTANCE_KM, DistanceSource, LoanRecord};
use pcaf_report::ReportContext;
use pcaf_vehicle_models::{ENGINE_SIZE_WILDCARD, FuelType, VehicleType};

use crate::commands::{self, ScheduleArgs, SummaryFormat};
use crate::config::Config;

enum Action {
    CalculateLoan,
    RunBatch,
    ShowSummary,
    ExportCsv,
    ListFactors,
    AmortizationSchedule,
}

/// Distance sources offered when calculating a loan, with their prompts.
const DISTANCE_SOURCES: &[(DistanceSource, &str)] = &[
    (DistanceSource::Unknown, "Not recorded"),
    (DistanceSource::Primary, "Actual (odometer or borrower reported)"),
    (DistanceSource::LocalStatistical, "Local statistical average"),
    (DistanceSource::RegionalStatistical, "Regional statistical average"),
];

impl Action {
    const ALL: &[Self] = &[
        Self::CalculateLoan,
        Self::RunBatch,
        Self::ShowSummary,
        Self::ExportCsv,
        Self::ListFactors,
        Self::AmortizationSchedule,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::CalculateLoan => "Calculate a single loan",
            Self::RunBatch => "Run a loan CSV batch",
            Self::ShowSummary => "Show portfolio summary",
            Self::ExportCsv => "Export loan-level CSV",
            Self::ListFactors => "List emission factors",
            Self::AmortizationSchedule => "Show an amortization schedule",
        }
    }
}

/// Runs the interactive menu.
///
/// # Errors
///
/// Returns an error if user input fails or the selected operation fails.
pub fn run(config: &Config, multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    println!("PCAF Financed Emissions");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::CalculateLoan => {
            let table = config.factor_table()?;
            let loan = prompt_loan(&table)?;
            let save = Confirm::new()
                .with_prompt("Save the result?")
                .default(true)
                .interact()?;
            commands::calculate(config, &loan, save)?;
        }
        Action::RunBatch => {
            let path: String = Input::new()
                .with_prompt("Path to loan CSV")
                .interact_text()?;
            let save = Confirm::new()
                .with_prompt("Save results?")
                .default(true)
                .interact()?;
            commands::batch(config, multi, &PathBuf::from(path.trim()), save)?;
        }
        Action::ShowSummary => {
            let institution: String = Input::new()
                .with_prompt("Institution name (leave empty to skip)")
                .allow_empty(true)
                .interact_text()?;
            let period: String = Input::new()
                .with_prompt("Reporting period")
                .default(default_period())
                .interact_text()?;
            let formats = &["Text", "JSON"];
            let format = match Select::new()
                .with_prompt("Format")
                .items(formats)
                .default(0)
                .interact()?
            {
                1 => SummaryFormat::Json,
                _ => SummaryFormat::Text,
            };
            let institution = Some(institution.trim().to_string()).filter(|s| !s.is_empty());
            commands::summary(config, format, &ReportContext::new(institution, period))?;
        }
        Action::ExportCsv => {
            let path: String = Input::new()
                .with_prompt("Output CSV path")
                .default("pcaf_loans.csv".to_string())
                .interact_text()?;
            commands::export(config, &PathBuf::from(path.trim()))?;
        }
        Action::ListFactors => commands::factors(config)?,
        Action::AmortizationSchedule => commands::schedule(&prompt_schedule()?)?,
    }

    Ok(())
}

fn prompt_loan(table: &FactorTable) -> Result<LoanRecord, Box<dyn std::error::Error>> {
    let loan_id: String = Input::new().with_prompt("Loan ID").interact_text()?;

    let vehicle_labels: Vec<&str> = VehicleType::all().iter().map(|v| v.label()).collect();
    let vehicle_type = VehicleType::all()[Select::new()
        .with_prompt("Vehicle type")
        .items(&vehicle_labels)
        .default(0)
        .interact()?];

    let fuel_labels: Vec<&str> = FuelType::all().iter().map(|f| f.label()).collect();
    let fuel_type = FuelType::all()[Select::new()
        .with_prompt("Fuel type")
        .items(&fuel_labels)
        .default(0)
        .interact()?];

    let engine_classes = engine_classes_for(table, vehicle_type, fuel_type);
    let engine_size = if engine_classes.len() > 1 {
        let idx = Select::new()
            .with_prompt("Engine size class")
            .items(&engine_classes)
            .default(0)
            .interact()?;
        engine_classes[idx].clone()
    } else {
        ENGINE_SIZE_WILDCARD.to_string()
    };

    let outstanding_balance: f64 = Input::new()
        .with_prompt("Outstanding balance")
        .interact_text()?;
    let vehicle_value: f64 = Input::new()
        .with_prompt("Vehicle value at origination")
        .interact_text()?;
    let loan_amount: f64 = Input::new()
        .with_prompt("Original loan amount")
        .default(0.0)
        .interact_text()?;
    let distance_km: f64 = Input::new()
        .with_prompt("Estimated annual distance (km)")
        .default(DEFAULT_ANNUAL_DISTANCE_KM)
        .interact_text()?;
    let source_labels: Vec<&str> = DISTANCE_SOURCES.iter().map(|(_, label)| *label).collect();
    let distance_source = DISTANCE_SOURCES[Select::new()
        .with_prompt("Distance source")
        .items(&source_labels)
        .default(0)
        .interact()?]
    .0;
    let make = prompt_text("Vehicle make (leave empty to skip)")?;
    let model = match make {
        Some(_) => prompt_text("Vehicle model")?,
        None => None,
    };
    let origination_date = prompt_date("Origination date (YYYY-MM-DD, leave empty to skip)")?;
    let reporting_date = prompt_date("Reporting date (YYYY-MM-DD, leave empty to skip)")?;

    Ok(LoanRecord {
        loan_amount,
        vehicle_make: make,
        vehicle_model: model,
        ..LoanRecord::new(loan_id.trim(), outstanding_balance, vehicle_value)
            .with_vehicle(vehicle_type, fuel_type)
            .with_engine_size(engine_size.as_str())
            .with_distance_km(distance_km)
            .with_distance_source(distance_source)
            .with_dates(origination_date, reporting_date)
    })
}

fn prompt_schedule() -> Result<ScheduleArgs, Box<dyn std::error::Error>> {
    let principal: f64 = Input::new().with_prompt("Principal").interact_text()?;
    let rate: f64 = Input::new()
        .with_prompt("Annual interest rate (%)")
        .interact_text()?;
    let term_months: u32 = Input::new()
        .with_prompt("Term (months)")
        .default(60)
        .interact_text()?;
    let origination_date = prompt_date("Origination date (YYYY-MM-DD)")?
        .ok_or("an origination date is required")?;
    let as_of = prompt_date("Balance as of (YYYY-MM-DD, leave empty to skip)")?;

    Ok(ScheduleArgs {
        principal,
        rate,
        term_months,
        origination_date,
        as_of,
        vehicle_value: None,
        full: true,
    })
}

fn prompt_text(prompt: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let raw: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(Some(raw.trim().to_string()).filter(|s| !s.is_empty()))
}

fn prompt_date(prompt: &str) -> Result<Option<NaiveDate>, Box<dyn std::error::Error>> {
    let raw: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(parse_date(&raw)?)
}

/// Engine classes the table has for a vehicle and fuel, wildcard first.
fn engine_classes_for(table: &FactorTable, vehicle: VehicleType, fuel: FuelType) -> Vec<String> {
    let specific: BTreeSet<&str> = table
        .factors()
        .iter()
        .filter(|f| f.vehicle_type == vehicle && f.fuel_type == fuel)
        .map(|f| f.engine_size_class.as_str())
        .filter(|e| *e != ENGINE_SIZE_WILDCARD)
        .collect();

    std::iter::once(ENGINE_SIZE_WILDCARD)
        .chain(specific)
        .map(str::to_string)
        .collect()
}

fn default_period() -> String {
    chrono::Local::now().format("%Y").to_string()
}
