//! Portfolio summary rendering.

use pcaf_portfolio_models::{DataQualityBand, PortfolioSummary};
use pcaf_vehicle_models::{DataQualityScore, PcafDataOption};

use crate::{ReportContext, ReportError};

const TITLE: &str = "PCAF Category 15 Financed Emissions Report";
const METHODOLOGY: &str = "PCAF Standard 2.0 - Category 15 (Motor Vehicle Loans)";

/// Renders a plain-text portfolio disclosure.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn render_text_summary(context: &ReportContext, summary: &PortfolioSummary) -> String {
    let mut lines = vec![
        TITLE.to_string(),
        "=".repeat(TITLE.len()),
        String::new(),
        format!(
            "Institution:       {}",
            context.institution.as_deref().unwrap_or("Not Specified")
        ),
        format!("Reporting period:  {}", context.reporting_period),
        format!("Report date:       {}", context.report_date),
        format!("Methodology:       {METHODOLOGY}"),
        String::new(),
        "Executive Summary".to_string(),
        "-----------------".to_string(),
        format!("Total loans:                 {}", summary.total_loans),
        format!(
            "Total loan value:            {}",
            format_amount(summary.total_loan_value)
        ),
        format!(
            "Outstanding balance:         {}",
            format_amount(summary.total_outstanding_balance)
        ),
        format!(
            "Total financed emissions:    {:.3} tCO2e",
            summary.total_financed_emissions_tco2e
        ),
        format!(
            "Emission intensity:          {:.4} kg CO2e per unit outstanding",
            summary.emission_intensity_kg_per_currency
        ),
        format!(
            "Average attribution factor:  {:.4}",
            summary.average_attribution_factor
        ),
        format!(
            "Weighted data quality score: {:.2} ({})",
            summary.weighted_data_quality_score,
            DataQualityBand::from_score(summary.weighted_data_quality_score)
        ),
        format!(
            "PCAF compliant loans:        {}/{} ({:.1}%)",
            summary.pcaf_compliant_loans,
            summary.total_loans,
            summary.pcaf_compliant_percentage()
        ),
        String::new(),
    ];

    push_breakdown(&mut lines, "Emissions by Fuel Type", &summary.emissions_by_fuel_type, summary);
    push_breakdown(
        &mut lines,
        "Emissions by Vehicle Type",
        &summary.emissions_by_vehicle_type,
        summary,
    );

    lines.push("Data Quality Distribution".to_string());
    lines.push("-------------------------".to_string());
    for score in DataQualityScore::all() {
        let count = summary
            .loans_by_data_quality
            .get(&score.value())
            .copied()
            .unwrap_or(0);
        if count == 0 {
            continue;
        }
        let share = if summary.total_loans == 0 {
            0.0
        } else {
            count as f64 / summary.total_loans as f64 * 100.0
        };
        lines.push(format!(
            "  Level {} {:<32} {count:>6} loan(s) {share:>6.1}%",
            score.value(),
            score.label(),
        ));
    }
    lines.push(String::new());

    if !summary.loans_by_pcaf_option.is_empty() {
        lines.push("PCAF Data Option Distribution".to_string());
        lines.push("-----------------------------".to_string());
        for (option, count) in &summary.loans_by_pcaf_option {
            let label = option
                .parse::<PcafDataOption>()
                .map_or_else(|_| display_name(option), |o| format!("Option {o} {}", o.name()));
            lines.push(format!("  {label:<48} {count:>6} loan(s)"));
        }
        lines.push(String::new());
    }

    if !summary.recommendations.is_empty() {
        lines.push("Recommendations".to_string());
        lines.push("---------------".to_string());
        lines.extend(summary.recommendations.iter().map(|r| format!("  - {r}")));
        lines.push(String::new());
    }

    lines.extend(
        [
            "Methodology",
            "-----------",
            "Attribution factor   = outstanding balance / vehicle value at origination",
            "Annual emissions     = annual distance (km) x emission factor (kg CO2/km) / 1000",
            "Temporal attribution = months of the reporting year covered by the loan / 12",
            "Financed emissions   = annual emissions x attribution factor x temporal attribution",
            "",
            "Data quality scores run from 1 (verified actual data) to 5 (highly uncertain).",
            "Loans scored 3 or better are PCAF compliant. The weighted score is averaged",
            "over outstanding balance.",
        ]
        .map(str::to_string),
    );

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Serializes `summary` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`ReportError::Json`] if serialization fails.
pub fn render_json_summary(summary: &PortfolioSummary) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(summary)?)
}

fn push_breakdown(
    lines: &mut Vec<String>,
    title: &str,
    breakdown: &std::collections::BTreeMap<String, f64>,
    summary: &PortfolioSummary,
) {
    lines.push(title.to_string());
    lines.push("-".repeat(title.len()));
    if breakdown.is_empty() {
        lines.push("  (none)".to_string());
    }

    let mut entries: Vec<(&String, &f64)> = breakdown.iter().collect();
    entries.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));

    for (name, emissions) in entries {
        lines.push(format!(
            "  {:<28} {emissions:>12.3} tCO2e {:>6.1}%",
            display_name(name),
            summary.emissions_share(*emissions)
        ));
    }
    lines.push(String::new());
}

/// `passenger_car` -> `Passenger car`.
fn display_name(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Formats an amount with thousands separators and two decimals.
fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}
