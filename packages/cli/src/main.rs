#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `pcaf`: PCAF motor vehicle financed-emissions toolchain.
//!
//! Without a subcommand, starts an interactive menu. Logging goes through
//! [`pcaf_cli_utils::init_logger`] so log lines and progress bars share
//! the terminal cleanly; set `RUST_LOG` to control verbosity.

mod commands;
mod config;
mod interactive;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pcaf_report::ReportContext;

use crate::commands::{CalculateArgs, ScheduleArgs, SummaryFormat};
use crate::config::Config;

#[derive(Parser)]
#[command(name = "pcaf", about = "PCAF motor vehicle financed-emissions toolchain")]
struct Cli {
    /// Emission factor table (TOML) to use instead of the built-in
    /// defaults. Overrides `PCAF_FACTORS_FILE`.
    #[arg(long, global = true)]
    factors: Option<PathBuf>,
    /// Directory holding the results database. Overrides `PCAF_DATA_DIR`.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate financed emissions for one loan
    Calculate(CalculateArgs),
    /// Calculate every loan in a CSV file
    Batch {
        /// Loan CSV file
        csv: PathBuf,
        /// Do not store results
        #[arg(long)]
        no_save: bool,
    },
    /// List the active emission factor table
    Factors,
    /// Summarize the latest stored result for every loan
    Summary {
        /// Output format
        #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
        format: SummaryFormat,
        /// Reporting institution name
        #[arg(long)]
        institution: Option<String>,
        /// Reporting period label (defaults to the current year)
        #[arg(long)]
        period: Option<String>,
    },
    /// Export the latest stored results as a loan-level CSV
    Export {
        /// Output CSV path
        out: PathBuf,
    },
    /// Show every stored calculation for one loan
    History {
        /// Loan identifier
        loan_id: String,
    },
    /// Print a loan's amortization schedule and balance on a date
    Schedule(ScheduleArgs),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = pcaf_cli_utils::init_logger();
    let cli = Cli::parse();
    let config = Config::resolve(cli.data_dir, cli.factors);

    log::debug!("Using {config:?}");

    let Some(command) = cli.command else {
        return interactive::run(&config, &multi);
    };

    match command {
        Commands::Calculate(args) => commands::calculate(&config, &args.to_loan(), args.save)?,
        Commands::Batch { csv, no_save } => commands::batch(&config, &multi, &csv, !no_save)?,
        Commands::Factors => commands::factors(&config)?,
        Commands::Summary {
            format,
            institution,
            period,
        } => {
            let period = period.unwrap_or_else(|| chrono::Local::now().format("%Y").to_string());
            commands::summary(&config, format, &ReportContext::new(institution, period))?;
        }
        Commands::Export { out } => commands::export(&config, &out)?,
        Commands::History { loan_id } => commands::history(&config, &loan_id)?,
        Commands::Schedule(args) => commands::schedule(&args)?,
    }

    Ok(())
}
