mod output;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use br_rural_credit::format::ScheduleReport;
use br_rural_credit::{SimulationForm, SimulationLimits, SimulationRecord, compute_schedule};

/// SAC loan simulations with grace period
#[derive(Parser)]
#[command(
    name = "sac",
    version,
    about = "SAC loan simulations with grace period",
    long_about = "Computes constant-amortization (SAC) schedules for rural credit \
                  simulations. Amounts use the Brazilian format (R$ 1.234,56), rates \
                  are nominal annual percentages and dates are DD/MM/YYYY."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// JSON file overriding the accepted input ranges
    #[arg(long, global = true)]
    limits: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the full month-by-month schedule
    Schedule(SimulationArgs),
    /// Print the first amortizing installment, as stored with a simulation
    Preview(SimulationArgs),
}

#[derive(Args)]
struct SimulationArgs {
    /// JSON file holding a simulation form
    #[arg(long, conflicts_with_all = ["principal", "rate", "term", "grace", "first_due_date"])]
    input: Option<PathBuf>,

    /// Financed amount, e.g. "R$ 150.000,00"
    #[arg(long, required_unless_present = "input")]
    principal: Option<String>,

    /// Nominal annual rate in percent, e.g. "6,5"
    #[arg(long, required_unless_present = "input")]
    rate: Option<String>,

    /// Total number of months, grace period included
    #[arg(long, required_unless_present = "input")]
    term: Option<String>,

    /// Interest-only months at the start of the loan
    #[arg(long)]
    grace: Option<String>,

    /// Due date of the first installment (DD/MM/YYYY)
    #[arg(long)]
    first_due_date: Option<String>,
}

impl SimulationArgs {
    fn into_form(self) -> Result<SimulationForm> {
        if let Some(path) = self.input {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("failed to read '{}'", path.display()))?;
            return serde_json::from_str(&contents)
                .with_context(|| format!("failed to parse '{}'", path.display()));
        }
        Ok(SimulationForm {
            principal: self.principal.unwrap_or_default(),
            annual_rate: self.rate.unwrap_or_default(),
            total_term_months: self.term.unwrap_or_default(),
            grace_period_months: self.grace.unwrap_or_default(),
            first_due_date: self.first_due_date,
        })
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn load_limits(path: Option<&Path>) -> Result<SimulationLimits> {
    let Some(path) = path else {
        return Ok(SimulationLimits::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read limits '{}'", path.display()))?;
    let limits = SimulationLimits::from_json(&contents)
        .with_context(|| format!("invalid limits in '{}'", path.display()))?;
    info!(path = %path.display(), "loaded simulation limits");
    Ok(limits)
}

fn run(cli: Cli) -> Result<String> {
    let limits = load_limits(cli.limits.as_deref())?;

    match cli.command {
        Commands::Schedule(args) => {
            let request = args.into_form()?.parse(&limits)?;
            debug!(input = ?request.input, "computing schedule");
            let schedule = compute_schedule(&request.input)?;
            let report = ScheduleReport::new(&schedule, request.first_due_date);
            output::render_schedule(cli.output, &report)
        }
        Commands::Preview(args) => {
            let request = args.into_form()?.parse(&limits)?;
            debug!(input = ?request.input, "estimating monthly payment");
            let record = SimulationRecord::new(&request.input)?;
            output::render_preview(cli.output, &record)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::Value;

    fn decimal(value: &Value) -> Decimal {
        value.as_str().unwrap().parse().unwrap()
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("sac").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_schedule_json_output() {
        let cli = parse(&[
            "--output", "json", "schedule",
            "--principal", "R$ 100.000,00",
            "--rate", "6",
            "--term", "24",
            "--grace", "6",
            "--first-due-date", "15/01/2026",
        ]);

        let value: Value = serde_json::from_str(&run(cli).unwrap()).unwrap();
        let installments = value["installments"].as_array().unwrap();

        assert_eq!(installments.len(), 24);
        assert_eq!(installments[0]["due_date"], "2026-01-15");
        assert_eq!(decimal(&installments[6]["remaining_balance"]), dec!(94444.44));
        assert_eq!(decimal(&value["total_payable"]), dec!(107750));
    }

    #[test]
    fn test_preview_table_output() {
        let cli = parse(&[
            "preview",
            "--principal", "100.000",
            "--rate", "6",
            "--term", "24",
        ]);

        let rendered = run(cli).unwrap();
        assert!(rendered.contains("Monthly payment"), "{rendered}");
        assert!(rendered.contains("R$ 4.666,67"), "{rendered}");
    }

    #[test]
    fn test_input_file_conflicts_with_flags() {
        let parsed = Cli::try_parse_from([
            "sac", "schedule", "--input", "form.json", "--principal", "1000",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_flags_required_without_input_file() {
        assert!(Cli::try_parse_from(["sac", "schedule", "--rate", "6", "--term", "24"]).is_err());
    }

    #[test]
    fn test_invalid_simulation_is_an_error() {
        let cli = parse(&[
            "schedule",
            "--principal", "50.000",
            "--rate", "5",
            "--term", "24",
            "--grace", "24",
        ]);

        let err = run(cli).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid grace period"), "{err:#}");
    }

    #[test]
    fn test_missing_limits_file_is_an_error() {
        let cli = parse(&[
            "--limits", "/nonexistent/limits.json", "preview",
            "--principal", "50.000",
            "--rate", "5",
            "--term", "24",
        ]);

        let err = run(cli).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read limits"), "{err:#}");
    }
}
