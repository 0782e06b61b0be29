use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::FilingStatus;

/// Everything the calculator collects about one taxpayer.
///
/// Unset amounts default to zero and the filing status to
/// [`FilingStatus::Single`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxpayerInput {
    pub filing_status: FilingStatus,
    pub age: u32,
    pub spouse_age: u32,

    /// Total dependents claimed.
    pub dependents: u32,
    /// Qualifying children under 17 (drives the child tax credit and the
    /// earned income credit tier).
    pub children_under_17: u32,

    // Income
    pub wages: Decimal,
    pub tip_income: Decimal,
    pub overtime_wages: Decimal,
    pub interest: Decimal,
    pub dividends: Decimal,
    pub capital_gains: Decimal,
    pub business_income: Decimal,
    pub social_security: Decimal,
    pub other_income: Decimal,

    // Itemized deductions (used only when `itemize` is set)
    pub itemize: bool,
    pub state_local_taxes: Decimal,
    pub property_tax: Decimal,
    pub mortgage_interest: Decimal,
    pub charitable_cash: Decimal,
    pub charitable_non_cash: Decimal,
    pub medical_expenses: Decimal,

    // Above-the-line adjustments
    pub student_loan_interest: Decimal,
    pub educator_expenses: Decimal,
    pub hsa_contributions: Decimal,
    pub ira_contributions: Decimal,
    pub retirement_401k: Decimal,

    // Payments
    pub federal_withholding: Decimal,
    pub estimated_payments: Decimal,

    pub refund_delivery: RefundDelivery,
}

/// Bank details for direct deposit of a refund.
///
/// Carried through untouched; the calculator never reads or validates them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefundDelivery {
    pub routing_number: String,
    pub account_number: String,
    pub account_type: String,
}
