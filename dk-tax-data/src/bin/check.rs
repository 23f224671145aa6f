use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use dk_tax_core::ReferenceRepository;
use dk_tax_data::{BundledReference, ConstantsLoader, MunicipalityLoader};

/// Validate tax reference data files before shipping them.
///
/// The constants file is a TOML table of rates and thresholds for one tax
/// year. The municipality file is a CSV with the columns:
/// - name: The municipality name
/// - municipal_tax_pct: Municipal tax percentage (e.g., 23.39)
/// - church_tax_pct: Church tax percentage (e.g., 0.80)
///
/// With no files given, the bundled data is checked.
#[derive(Parser, Debug)]
#[command(name = "dk-tax-data-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a constants TOML file
    #[arg(short, long)]
    constants: Option<PathBuf>,

    /// Path to a municipality CSV file
    #[arg(short, long)]
    municipalities: Option<PathBuf>,

    /// Number of municipalities the table must contain
    #[arg(long)]
    expect_count: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.constants.is_none() && args.municipalities.is_none() {
        let reference = BundledReference::load().context("Bundled reference data is invalid")?;
        for tax_year in reference.list_tax_years() {
            let count = reference.municipalities(tax_year)?.len();
            println!("Bundled tax year {}: constants OK, {} municipalities", tax_year, count);
            check_count(count, args.expect_count)?;
        }
        return Ok(());
    }

    if let Some(path) = &args.constants {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {}", path.display()))?;
        let constants = ConstantsLoader::parse(&source)
            .with_context(|| format!("Invalid constants file: {}", path.display()))?;
        println!("Constants for tax year {} are valid.", constants.tax_year);
    }

    if let Some(path) = &args.municipalities {
        let file =
            File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
        let records = MunicipalityLoader::parse(file)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        println!("Parsed {} municipalities from CSV", records.len());
        check_count(records.len(), args.expect_count)?;
    }

    Ok(())
}

fn check_count(
    count: usize,
    expected: Option<usize>,
) -> Result<()> {
    match expected {
        Some(expected) if count != expected => {
            bail!("Expected {} municipalities, found {}", expected, count)
        }
        _ => Ok(()),
    }
}
