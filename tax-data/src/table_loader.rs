use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{
    BracketSchedule, ByFilingStatus, FilingStatus, ProvisionConstants, TaxBracket, TaxTableError,
    TaxYearTable,
};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading a tax-year table.
#[derive(Debug, Error)]
pub enum TaxYearTableLoadError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("No brackets for schedule {0}")]
    MissingSchedule(&'static str),

    #[error("Bracket file is for tax year {brackets} but provisions are for {provisions}")]
    TaxYearMismatch { brackets: i32, provisions: i32 },

    #[error("Invalid tax table: {0}")]
    Table(#[from] TaxTableError),

    #[error("Failed to read table file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for TaxYearTableLoadError {
    fn from(err: csv::Error) -> Self {
        TaxYearTableLoadError::CsvParse(err.to_string())
    }
}

/// Maps IRS schedule codes to filing statuses.
///
/// - Schedule X → Single
/// - Schedule Y-1 → Married Filing Jointly
/// - Schedule Y-2 → Married Filing Separately
/// - Schedule Z → Head of Household
fn schedule_to_filing_status(schedule: &str) -> Result<FilingStatus, TaxYearTableLoadError> {
    match schedule {
        "X" => Ok(FilingStatus::Single),
        "Y-1" => Ok(FilingStatus::MarriedFilingJointly),
        "Y-2" => Ok(FilingStatus::MarriedFilingSeparately),
        "Z" => Ok(FilingStatus::HeadOfHousehold),
        _ => Err(TaxYearTableLoadError::InvalidSchedule(schedule.to_string())),
    }
}

fn filing_status_to_schedule(status: FilingStatus) -> &'static str {
    match status {
        FilingStatus::Single => "X",
        FilingStatus::MarriedFilingJointly => "Y-1",
        FilingStatus::MarriedFilingSeparately => "Y-2",
        FilingStatus::HeadOfHousehold => "Z",
    }
}

/// A single record from the tax brackets CSV file.
///
/// The CSV format uses IRS schedule designations:
/// - `tax_year`: The tax year (e.g., 2025)
/// - `schedule`: The IRS schedule code (X, Y-1, Y-2, Z)
/// - `min_income`: The minimum income for this bracket
/// - `max_income`: The maximum income for this bracket (empty for unlimited)
/// - `rate`: The marginal tax rate as a decimal (e.g., 0.10 for 10%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    pub tax_year: i32,
    pub schedule: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// The provisions file: standard deductions and provision constants for one
/// tax year.
///
/// ```toml
/// tax_year = 2025
///
/// [standard_deductions]
/// single = "15000"
/// # ...
///
/// [provisions]
/// child_tax_credit_per_child = "2200"
/// # ...
///
/// [provisions.earned_income_credit]
/// agi_ceiling = "63398"
///
/// [[provisions.earned_income_credit.tiers]]
/// earned_income_threshold = "17640"
/// rate = "0.0765"
/// max_credit = "632"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProvisionsFile {
    pub tax_year: i32,
    pub standard_deductions: ByFilingStatus<Decimal>,
    pub provisions: ProvisionConstants,
}

/// Loader for tax-year tables from a bracket CSV and a provisions TOML file.
///
/// The CSV uses IRS schedule codes (X, Y-1, Y-2, Z) which are mapped to the
/// matching filing status.
pub struct TaxYearTableLoader;

impl TaxYearTableLoader {
    /// Parse tax bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a string slice.
    pub fn parse_brackets<R: Read>(reader: R) -> Result<Vec<TaxBracketRecord>, TaxYearTableLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxBracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    pub fn parse_provisions(input: &str) -> Result<ProvisionsFile, TaxYearTableLoadError> {
        Ok(toml::from_str(input)?)
    }

    /// Assemble and validate a [`TaxYearTable`].
    ///
    /// Every bracket record must carry the provisions file's tax year, and
    /// all four schedules must be present. Brackets within a schedule may
    /// appear in any order.
    pub fn load<R: Read>(
        brackets: R,
        provisions: &str,
    ) -> Result<TaxYearTable, TaxYearTableLoadError> {
        let records = Self::parse_brackets(brackets)?;
        let provisions = Self::parse_provisions(provisions)?;

        let mut grouped: HashMap<FilingStatus, Vec<TaxBracket>> = HashMap::new();
        for record in &records {
            if record.tax_year != provisions.tax_year {
                return Err(TaxYearTableLoadError::TaxYearMismatch {
                    brackets: record.tax_year,
                    provisions: provisions.tax_year,
                });
            }
            let status = schedule_to_filing_status(&record.schedule)?;
            grouped.entry(status).or_default().push(TaxBracket::new(
                record.min_income,
                record.max_income,
                record.rate,
            ));
        }

        let mut take = |status: FilingStatus| {
            let mut brackets = grouped
                .remove(&status)
                .ok_or(TaxYearTableLoadError::MissingSchedule(filing_status_to_schedule(status)))?;
            brackets.sort_by(|a, b| a.lower_bound.cmp(&b.lower_bound));
            Ok::<_, TaxYearTableLoadError>(BracketSchedule::new(brackets))
        };

        let table = TaxYearTable {
            tax_year: provisions.tax_year,
            brackets: ByFilingStatus {
                single: take(FilingStatus::Single)?,
                married_filing_jointly: take(FilingStatus::MarriedFilingJointly)?,
                married_filing_separately: take(FilingStatus::MarriedFilingSeparately)?,
                head_of_household: take(FilingStatus::HeadOfHousehold)?,
            },
            standard_deductions: provisions.standard_deductions,
            provisions: provisions.provisions,
        };
        table.validate()?;

        debug!(brackets = records.len(), "assembled tax-year table");
        Ok(table)
    }

    /// Read both files from disk and delegate to [`TaxYearTableLoader::load`].
    pub fn from_files(
        brackets_path: &Path,
        provisions_path: &Path,
    ) -> Result<TaxYearTable, TaxYearTableLoadError> {
        let brackets = std::fs::File::open(brackets_path)?;
        let provisions = std::fs::read_to_string(provisions_path)?;
        let table = Self::load(brackets, &provisions)?;

        info!(
            tax_year = table.tax_year,
            brackets = %brackets_path.display(),
            provisions = %provisions_path.display(),
            "loaded tax-year table"
        );
        Ok(table)
    }
}
