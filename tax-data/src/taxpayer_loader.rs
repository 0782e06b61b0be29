//! CSV loader for taxpayer input records.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Whitespace
//! around values is trimmed. Only `filing_status` is required; every other
//! column may be omitted, and omitted columns and empty cells read as zero.
//!
//! | Column                  | Type    | Notes |
//! |-------------------------|---------|-------|
//! | `filing_status`         | string  | `S`, `MFJ`, `MFS`, `HOH` or the snake_case name; empty is `S` |
//! | `age`, `spouse_age`     | integer | |
//! | `dependents`, `children_under_17` | integer | |
//! | `wages`, `tip_income`, `overtime_wages`, `interest`, `dividends`, `capital_gains`, `business_income`, `social_security`, `other_income` | amount | |
//! | `itemize`               | flag    | `true/false`, `yes/no`, `y/n`, `1/0`; empty is false |
//! | `state_local_taxes`, `property_tax`, `mortgage_interest`, `charitable_cash`, `charitable_non_cash`, `medical_expenses` | amount | |
//! | `student_loan_interest`, `educator_expenses`, `hsa_contributions`, `ira_contributions`, `retirement_401k` | amount | |
//! | `federal_withholding`, `estimated_payments` | amount | |
//! | `routing_number`, `account_number`, `account_type` | string | passed through untouched |
//!
//! Amounts may carry `$` and thousands separators. Unparseable, negative or
//! out-of-range amounts become zero, as do unparseable ages and counts.
//!
//! ### Minimal example
//!
//! ```csv
//! filing_status,wages,federal_withholding
//! S,"$50,000",5000
//! ```

use std::path::Path;

use serde::Deserialize;
use tax_core::{FilingStatus, RefundDelivery, TaxpayerInput};
use thiserror::Error;
use tracing::debug;

use crate::amount::{normalize_amount, normalize_count};

// ---------------------------------------------------------------------------
// Raw row: every cell as text, so normalization happens in one place
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    filing_status: String,
    #[serde(default)]
    age: String,
    #[serde(default)]
    spouse_age: String,
    #[serde(default)]
    dependents: String,
    #[serde(default)]
    children_under_17: String,
    #[serde(default)]
    wages: String,
    #[serde(default)]
    tip_income: String,
    #[serde(default)]
    overtime_wages: String,
    #[serde(default)]
    interest: String,
    #[serde(default)]
    dividends: String,
    #[serde(default)]
    capital_gains: String,
    #[serde(default)]
    business_income: String,
    #[serde(default)]
    social_security: String,
    #[serde(default)]
    other_income: String,
    #[serde(default)]
    itemize: String,
    #[serde(default)]
    state_local_taxes: String,
    #[serde(default)]
    property_tax: String,
    #[serde(default)]
    mortgage_interest: String,
    #[serde(default)]
    charitable_cash: String,
    #[serde(default)]
    charitable_non_cash: String,
    #[serde(default)]
    medical_expenses: String,
    #[serde(default)]
    student_loan_interest: String,
    #[serde(default)]
    educator_expenses: String,
    #[serde(default)]
    hsa_contributions: String,
    #[serde(default)]
    ira_contributions: String,
    #[serde(default)]
    retirement_401k: String,
    #[serde(default)]
    federal_withholding: String,
    #[serde(default)]
    estimated_payments: String,
    #[serde(default)]
    routing_number: String,
    #[serde(default)]
    account_number: String,
    #[serde(default)]
    account_type: String,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading taxpayer records.
#[derive(Debug, Error)]
pub enum TaxpayerLoadError {
    /// The CSV is structurally invalid or lacks the `filing_status` column.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A `filing_status` cell is not a recognised code or name.
    /// `row` is 1-based (header = row 0).
    #[error("unrecognised filing status '{status}' on row {row}")]
    InvalidFilingStatus { status: String, row: usize },

    /// A yes/no column holds something other than a recognised flag.
    #[error("invalid {column} value '{value}' on row {row}")]
    InvalidFlag {
        column: &'static str,
        value: String,
        row: usize,
    },

    #[error("failed to read taxpayer file: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn parse_filing_status(
    value: String,
    row: usize,
) -> Result<FilingStatus, TaxpayerLoadError> {
    if value.is_empty() {
        return Ok(FilingStatus::default());
    }
    FilingStatus::parse(&value)
        .ok_or(TaxpayerLoadError::InvalidFilingStatus { status: value, row })
}

fn parse_flag(
    column: &'static str,
    value: String,
    row: usize,
) -> Result<bool, TaxpayerLoadError> {
    match value.to_ascii_lowercase().as_str() {
        "" | "false" | "no" | "n" | "0" => Ok(false),
        "true" | "yes" | "y" | "1" => Ok(true),
        _ => Err(TaxpayerLoadError::InvalidFlag { column, value, row }),
    }
}

/// Convert a single CSV row into a [`TaxpayerInput`].
///
/// `row` is 1-based (for error messages).
fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<TaxpayerInput, TaxpayerLoadError> {
    Ok(TaxpayerInput {
        filing_status: parse_filing_status(row.filing_status, row_number)?,
        age: normalize_count(&row.age),
        spouse_age: normalize_count(&row.spouse_age),
        dependents: normalize_count(&row.dependents),
        children_under_17: normalize_count(&row.children_under_17),
        wages: normalize_amount(&row.wages),
        tip_income: normalize_amount(&row.tip_income),
        overtime_wages: normalize_amount(&row.overtime_wages),
        interest: normalize_amount(&row.interest),
        dividends: normalize_amount(&row.dividends),
        capital_gains: normalize_amount(&row.capital_gains),
        business_income: normalize_amount(&row.business_income),
        social_security: normalize_amount(&row.social_security),
        other_income: normalize_amount(&row.other_income),
        itemize: parse_flag("itemize", row.itemize, row_number)?,
        state_local_taxes: normalize_amount(&row.state_local_taxes),
        property_tax: normalize_amount(&row.property_tax),
        mortgage_interest: normalize_amount(&row.mortgage_interest),
        charitable_cash: normalize_amount(&row.charitable_cash),
        charitable_non_cash: normalize_amount(&row.charitable_non_cash),
        medical_expenses: normalize_amount(&row.medical_expenses),
        student_loan_interest: normalize_amount(&row.student_loan_interest),
        educator_expenses: normalize_amount(&row.educator_expenses),
        hsa_contributions: normalize_amount(&row.hsa_contributions),
        ira_contributions: normalize_amount(&row.ira_contributions),
        retirement_401k: normalize_amount(&row.retirement_401k),
        federal_withholding: normalize_amount(&row.federal_withholding),
        estimated_payments: normalize_amount(&row.estimated_payments),
        refund_delivery: RefundDelivery {
            routing_number: row.routing_number,
            account_number: row.account_number,
            account_type: row.account_type,
        },
    })
}

/// Parse CSV text and return one [`TaxpayerInput`] per row, in file order.
///
/// # Errors
///
/// * [`TaxpayerLoadError::Parse`] if the CSV is structurally invalid or has
///   no `filing_status` column.
/// * [`TaxpayerLoadError::InvalidFilingStatus`] for an unknown status.
/// * [`TaxpayerLoadError::InvalidFlag`] for an unreadable `itemize` cell.
pub fn load_from_str(input: &str) -> Result<Vec<TaxpayerInput>, TaxpayerLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let taxpayers = reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(rows = taxpayers.len(), "loaded taxpayer records");
    Ok(taxpayers)
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<TaxpayerInput>, TaxpayerLoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}
