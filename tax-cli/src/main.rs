use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::info;

use tax_core::{FilingStatus, PayFrequency, TaxEngine, TaxYearTable, WithholdingRequest};
use tax_data::{TaxYearTableLoader, parse_amount, taxpayer_loader};

use crate::report::{BracketReport, ProvisionReport};

mod logging;
mod report;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Federal income tax calculator with the 2025 OBBBA provisions.
///
/// Uses the built-in 2025 tables unless a bracket CSV and a provisions TOML
/// file are supplied.
#[derive(Debug, Parser)]
#[command(name = "tax-calc", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Bracket CSV (tax_year, schedule, min_income, max_income, rate).
    #[arg(long, global = true, requires = "provisions_file")]
    bracket_file: Option<PathBuf>,

    /// Provisions TOML with standard deductions and provision constants.
    #[arg(long, global = true, requires = "bracket_file")]
    provisions_file: Option<PathBuf>,

    /// Append log records to this file as well as stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Increase log detail (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute a return for every row of a taxpayer CSV
    Compute {
        /// CSV file of taxpayer records, one return per row
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Show the bracket schedule for one filing status, or for all of them
    Brackets {
        /// S, MFJ, MFS, HOH or the snake_case name
        #[arg(short, long, value_parser = parse_filing_status)]
        status: Option<FilingStatus>,
    },
    /// Show standard deductions and provision constants
    Provisions,
    /// Estimate W-4 withholding per paycheck
    Withholding {
        /// S, MFJ, MFS, HOH or the snake_case name
        #[arg(short, long, value_parser = parse_filing_status, default_value = "S")]
        status: FilingStatus,

        /// Expected annual income
        #[arg(short, long, value_parser = parse_amount)]
        income: Decimal,

        /// weekly, biweekly, semimonthly or monthly
        #[arg(short, long, default_value_t = PayFrequency::Biweekly)]
        frequency: PayFrequency,

        /// Annual pre-tax payroll deductions (401(k), HSA, ...)
        #[arg(long, value_parser = parse_amount, default_value = "0")]
        pre_tax: Decimal,

        /// Extra amount to withhold each paycheck
        #[arg(long, value_parser = parse_amount, default_value = "0")]
        additional: Decimal,
    },
}

fn parse_filing_status(s: &str) -> Result<FilingStatus, String> {
    FilingStatus::parse(s).ok_or_else(|| format!("unknown filing status '{s}'"))
}

impl Cli {
    fn table(&self) -> Result<TaxYearTable> {
        match (&self.bracket_file, &self.provisions_file) {
            (Some(brackets), Some(provisions)) => {
                TaxYearTableLoader::from_files(brackets, provisions).with_context(|| {
                    format!(
                        "Failed to load tax tables from {} and {}",
                        brackets.display(),
                        provisions.display()
                    )
                })
            }
            _ => Ok(TaxYearTable::tax_year_2025()),
        }
    }
}

// ─── commands ────────────────────────────────────────────────────────────────

fn compute_file(
    engine: &TaxEngine<'_>,
    input: &Path,
) -> Result<()> {
    let taxpayers = taxpayer_loader::load_from_file(input)
        .with_context(|| format!("Failed to load taxpayers from {}", input.display()))?;
    info!(
        rows = taxpayers.len(),
        tax_year = engine.table().tax_year,
        "computing returns"
    );

    for (index, taxpayer) in taxpayers.iter().enumerate() {
        let calculation = engine.compute(taxpayer);
        println!("Row {} ({})", index + 1, taxpayer.filing_status);
        println!("{calculation}");
        println!();
    }

    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_file.as_deref())?;

    let table = cli.table()?;
    let engine = TaxEngine::new(&table).context("Tax-year table is invalid")?;

    match cli.command {
        Command::Compute { input } => compute_file(&engine, &input)?,
        Command::Brackets { status } => print!("{}", BracketReport::new(&table, status)),
        Command::Provisions => print!("{}", ProvisionReport(&table)),
        Command::Withholding {
            status,
            income,
            frequency,
            pre_tax,
            additional,
        } => {
            let estimate = engine.estimate_withholding(&WithholdingRequest {
                filing_status: status,
                annual_income: income,
                pay_frequency: frequency,
                pre_tax_deductions: pre_tax,
                additional_withholding: additional,
            });
            println!("{estimate}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn compute_alone_uses_built_in_table() {
        let cli = Cli::try_parse_from(["tax-calc", "compute", "--input", "taxpayers.csv"])
            .expect("valid args");

        match &cli.command {
            Command::Compute { input } => assert_eq!(input, &PathBuf::from("taxpayers.csv")),
            other => panic!("expected compute, got {other:?}"),
        }
        assert_eq!(cli.table().expect("built-in table"), TaxYearTable::tax_year_2025());
    }

    #[test]
    fn bracket_file_requires_provisions_file() {
        let result = Cli::try_parse_from([
            "tax-calc",
            "provisions",
            "--bracket-file",
            "b.csv",
        ]);

        assert_eq!(
            result.expect_err("provisions file missing").kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["tax-calc", "brackets", "-s", "hoh", "-vv"])
            .expect("valid args");

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Brackets { status } => {
                assert_eq!(status, Some(FilingStatus::HeadOfHousehold))
            }
            other => panic!("expected brackets, got {other:?}"),
        }
    }

    #[test]
    fn unknown_filing_status_is_rejected() {
        let result = Cli::try_parse_from(["tax-calc", "brackets", "--status", "QSS"]);

        assert_eq!(
            result.expect_err("QSS is not supported").kind(),
            clap::error::ErrorKind::ValueValidation
        );
    }

    #[test]
    fn withholding_parses_amounts_and_defaults() {
        let cli = Cli::try_parse_from([
            "tax-calc",
            "withholding",
            "--income",
            "$60,000",
            "--pre-tax",
            "1,500",
        ])
        .expect("valid args");

        match cli.command {
            Command::Withholding {
                status,
                income,
                frequency,
                pre_tax,
                additional,
            } => {
                assert_eq!(status, FilingStatus::Single);
                assert_eq!(income, dec!(60000));
                assert_eq!(frequency, PayFrequency::Biweekly);
                assert_eq!(pre_tax, dec!(1500));
                assert_eq!(additional, dec!(0));
            }
            other => panic!("expected withholding, got {other:?}"),
        }
    }

    #[test]
    fn withholding_rejects_unknown_frequency() {
        let result = Cli::try_parse_from([
            "tax-calc",
            "withholding",
            "-i",
            "50000",
            "-f",
            "daily",
        ]);

        assert_eq!(
            result.expect_err("daily is not a pay frequency").kind(),
            clap::error::ErrorKind::ValueValidation
        );
    }

    #[test]
    fn missing_table_files_report_both_paths() {
        let cli = Cli::try_parse_from([
            "tax-calc",
            "provisions",
            "--bracket-file",
            "missing-brackets.csv",
            "--provisions-file",
            "missing-provisions.toml",
        ])
        .expect("valid args");

        let message = format!("{:#}", cli.table().expect_err("files do not exist"));

        assert!(message.contains("missing-brackets.csv"), "{message}");
        assert!(message.contains("missing-provisions.toml"), "{message}");
    }
}
