use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

use dk_tax_cli::commands::TaxYearContext;
use dk_tax_cli::csv_loader;
use dk_tax_cli::logging::init_logging;
use dk_tax_cli::requests::{
    CurveRequest, EarningsLimitRequest, FullTimeRequest, HoursCurveRequest, PartTimeRequest,
    PeriodisationRequest, StudentCurveRequest, StudentRequest,
};
use dk_tax_data::BundledReference;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Danish net income calculator.
///
/// Percentages are whole numbers (`--pension-pct 4` is 4 %). Amounts accept
/// thousands separators (`480,000`). Results are printed as JSON.
#[derive(Debug, Parser)]
#[command(name = "dk-tax", version)]
struct Cli {
    /// Tax year to calculate for.
    #[arg(long, global = true, default_value_t = 2026)]
    year: i32,

    /// More log output on stderr; repeat for more detail.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Append log output to this file as well.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Salaried full-time employee
    Fulltime(FullTimeRequest),
    /// Hourly-paid employee
    Parttime(PartTimeRequest),
    /// Student on the grant with a side job
    Student(StudentRequest),
    /// Net income across gross salaries
    Curve(CurveRequest),
    /// Net income across monthly hours
    HoursCurve(HoursCurveRequest),
    /// Student net income across monthly work hours
    StudentCurve(StudentCurveRequest),
    /// Annual earnings limit from the situation in each month
    EarningsLimit(EarningsLimitRequest),
    /// Regular versus periodised earnings limit for a mid-year start or finish
    Periodisation(PeriodisationRequest),
    /// Full-time requests from a CSV file, one JSON line per row
    Batch {
        /// CSV file with a `gross_annual` column
        path: PathBuf,
    },
    /// Constants and municipality rates for the tax year
    Meta,
}

// ─── output ──────────────────────────────────────────────────────────────────

fn print_json<T: Serialize>(
    value: &T,
    pretty: bool,
) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let reference = BundledReference::load().context("bundled reference data is invalid")?;
    let context = TaxYearContext::new(&reference, cli.year)
        .with_context(|| format!("cannot calculate for tax year {}", cli.year))?;
    debug!(tax_year = cli.year, command = ?cli.command, "running");

    match &cli.command {
        Command::Fulltime(request) => print_json(&context.fulltime(request)?, cli.pretty),
        Command::Parttime(request) => print_json(&context.parttime(request)?, cli.pretty),
        Command::Student(request) => print_json(&context.student(request)?, cli.pretty),
        Command::Curve(request) => print_json(&context.curve(request)?, cli.pretty),
        Command::HoursCurve(request) => print_json(&context.hours_curve(request)?, cli.pretty),
        Command::StudentCurve(request) => {
            print_json(&context.student_curve(request)?, cli.pretty)
        }
        Command::EarningsLimit(request) => {
            print_json(&context.earnings_limit(request)?, cli.pretty)
        }
        Command::Periodisation(request) => {
            print_json(&context.periodisation(request)?, cli.pretty)
        }
        Command::Batch { path } => {
            let requests = csv_loader::load_from_file(path)
                .map_err(|e| anyhow::anyhow!(e))
                .with_context(|| format!("failed to load {}", path.display()))?;
            info!(rows = requests.len(), path = %path.display(), "batch loaded");
            for row in context.batch(&requests) {
                print_json(&row, false)?;
            }
            Ok(())
        }
        Command::Meta => print_json(&context.meta()?, cli.pretty),
    }
}
