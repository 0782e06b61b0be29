use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionMethod {
    Standard,
    Itemized,
}

impl DeductionMethod {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Itemized => "itemized",
        }
    }
}

/// Deductions from the OBBBA provisions, taken on top of the standard or
/// itemized deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObbbaSavings {
    pub tips_deduction: Decimal,
    pub overtime_deduction: Decimal,
    pub senior_deduction: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
    pub child_tax_credit: Decimal,
    pub earned_income_credit: Decimal,
    pub total: Decimal,
}

/// Result of running the calculation pipeline over one [`TaxpayerInput`].
///
/// Rates are percentages (`22` means 22%).
///
/// [`TaxpayerInput`]: crate::TaxpayerInput
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculation {
    pub gross_income: Decimal,
    pub adjustments: Decimal,
    pub agi: Decimal,

    /// Standard deduction for the filing status, including senior additions.
    pub standard_deduction: Decimal,
    /// Itemized total, computed even when the taxpayer does not itemize.
    pub itemized_deduction: Decimal,
    pub deduction_method: DeductionMethod,
    /// The deduction actually taken.
    pub deductions: Decimal,

    pub obbba_savings: ObbbaSavings,
    pub taxable_income: Decimal,
    pub tax_before_credits: Decimal,
    pub credits: Credits,
    pub total_tax: Decimal,
    pub total_payments: Decimal,

    /// Positive is a refund, negative is an amount owed.
    pub refund_or_owed: Decimal,

    pub effective_rate: Decimal,
    pub marginal_rate: Decimal,
}

impl TaxCalculation {
    pub fn is_refund(&self) -> bool {
        self.refund_or_owed > Decimal::ZERO
    }

    /// Refund due, or zero when the taxpayer owes.
    pub fn refund(&self) -> Decimal {
        self.refund_or_owed.max(Decimal::ZERO)
    }

    /// Balance due, or zero when a refund is expected.
    pub fn amount_owed(&self) -> Decimal {
        (-self.refund_or_owed).max(Decimal::ZERO)
    }
}

impl fmt::Display for TaxCalculation {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Gross income:        {:>12}", self.gross_income)?;
        writeln!(f, "Adjustments:         {:>12}", self.adjustments)?;
        writeln!(f, "AGI:                 {:>12}", self.agi)?;
        writeln!(
            f,
            "Deduction ({:<8}):  {:>12}",
            self.deduction_method.label(),
            self.deductions
        )?;
        writeln!(f, "OBBBA savings:       {:>12}", self.obbba_savings.total)?;
        writeln!(f, "  tips:              {:>12}", self.obbba_savings.tips_deduction)?;
        writeln!(f, "  overtime:          {:>12}", self.obbba_savings.overtime_deduction)?;
        writeln!(f, "  senior:            {:>12}", self.obbba_savings.senior_deduction)?;
        writeln!(f, "Taxable income:      {:>12}", self.taxable_income)?;
        writeln!(f, "Tax before credits:  {:>12}", self.tax_before_credits)?;
        writeln!(f, "Credits:             {:>12}", self.credits.total)?;
        writeln!(f, "  child tax credit:  {:>12}", self.credits.child_tax_credit)?;
        writeln!(f, "  earned income:     {:>12}", self.credits.earned_income_credit)?;
        writeln!(f, "Total tax:           {:>12}", self.total_tax)?;
        writeln!(f, "Total payments:      {:>12}", self.total_payments)?;
        if self.is_refund() {
            writeln!(f, "Refund:              {:>12}", self.refund())?;
        } else {
            writeln!(f, "Amount owed:         {:>12}", self.amount_owed())?;
        }
        writeln!(f, "Effective rate:      {:>11}%", self.effective_rate)?;
        write!(f, "Marginal rate:       {:>11}%", self.marginal_rate)
    }
}
