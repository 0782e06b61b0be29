//! The income-tax calculation pipeline.
//!
//! # Pipeline
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Gross income (Social Security included at the table's inclusion rate) |
//! | 2    | Above-the-line adjustments, each clipped to its cap |
//! | 3    | AGI (Line 1 - Line 2, minimum 0) |
//! | 4    | OBBBA deductions: tips, overtime, senior |
//! | 5    | Standard deduction, plus senior additions |
//! | 6    | Itemized deduction (SALT cap, medical AGI floor) |
//! | 7    | Deduction taken (itemized only if elected and larger) |
//! | 8    | Taxable income (Line 3 - Line 7 - Line 4, minimum 0) |
//! | 9    | Tax from the bracket schedule |
//! | 10   | Marginal rate |
//! | 11   | Credits: child tax credit + earned income credit |
//! | 12   | Total tax (Line 9 - Line 11, minimum 0) |
//! | 13   | Payments: withholding + estimated payments |
//! | 14   | Refund (positive) or amount owed (negative) |
//! | 15   | Effective rate (Line 12 / Line 1) |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::TaxEngine;
//! use tax_core::{TaxYearTable, TaxpayerInput};
//!
//! let table = TaxYearTable::tax_year_2025();
//! let engine = TaxEngine::new(&table).unwrap();
//!
//! let input = TaxpayerInput {
//!     age: 35,
//!     wages: dec!(50000),
//!     federal_withholding: dec!(5000),
//!     ..Default::default()
//! };
//!
//! let result = engine.compute(&input);
//!
//! assert_eq!(result.taxable_income, dec!(35000.00));
//! assert_eq!(result.total_tax, dec!(3961.50));
//! assert_eq!(result.refund_or_owed, dec!(1038.50));
//! ```

use std::sync::LazyLock;

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{capped, non_negative, percentage, round_half_up, saturating_sum};
use crate::calculations::{bracket_tax, credits, deductions, withholding};
use crate::{
    ProvisionConstants, TaxCalculation, TaxTableError, TaxYearTable, TaxpayerInput,
    WithholdingEstimate, WithholdingRequest,
};

static TAX_YEAR_2025: LazyLock<TaxYearTable> = LazyLock::new(TaxYearTable::tax_year_2025);

/// Runs the pipeline against the built-in 2025 table.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::TaxpayerInput;
/// use tax_core::calculations::compute;
///
/// let result = compute(&TaxpayerInput::default());
///
/// assert_eq!(result.total_tax, dec!(0));
/// assert_eq!(result.effective_rate, dec!(0));
/// ```
pub fn compute(input: &TaxpayerInput) -> TaxCalculation {
    TaxEngine::bind(&TAX_YEAR_2025).compute(input)
}

/// Calculator bound to one [`TaxYearTable`].
///
/// The engine only reads its table, so one table can back any number of
/// engines on any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct TaxEngine<'a> {
    table: &'a TaxYearTable,
}

impl<'a> TaxEngine<'a> {
    /// Validates `table` and binds an engine to it.
    ///
    /// # Errors
    ///
    /// Returns [`TaxTableError`] if any bracket schedule, standard deduction
    /// or provision constant is inconsistent.
    pub fn new(table: &'a TaxYearTable) -> Result<Self, TaxTableError> {
        table.validate()?;
        Ok(Self::bind(table))
    }

    fn bind(table: &'a TaxYearTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a TaxYearTable {
        self.table
    }

    /// Computes the full calculation for `input`.
    ///
    /// Deterministic and side-effect free. Negative amounts are read as zero.
    pub fn compute(
        &self,
        input: &TaxpayerInput,
    ) -> TaxCalculation {
        let provisions = &self.table.provisions;
        let schedule = self.table.schedule(input.filing_status);

        let gross_income = self.gross_income(input, provisions);
        let adjustments = self.adjustments(input, provisions);
        let agi = self.agi(gross_income, adjustments);

        let obbba_savings = deductions::obbba_savings(input, provisions);
        let standard_deduction = deductions::standard_deduction(
            input,
            self.table.standard_deduction(input.filing_status),
            provisions,
        );
        let itemized_deduction = deductions::itemized_deduction(input, agi, provisions);
        let (deductions, deduction_method) =
            deductions::choose_deduction(input.itemize, itemized_deduction, standard_deduction);

        let taxable_income = self.taxable_income(agi, deductions, obbba_savings.total);
        let tax_before_credits = bracket_tax::tax_on(schedule, taxable_income);
        let marginal_rate = bracket_tax::marginal_rate(schedule, taxable_income);

        let credits = credits::credits(input, agi, provisions);
        let total_tax = self.total_tax(tax_before_credits, credits.total);
        let total_payments = self.total_payments(input);
        let refund_or_owed = round_half_up(total_payments - total_tax);
        let effective_rate = percentage(total_tax, gross_income);

        debug!(
            filing_status = input.filing_status.as_str(),
            %agi,
            %taxable_income,
            %total_tax,
            %refund_or_owed,
            "computed tax"
        );

        TaxCalculation {
            gross_income,
            adjustments,
            agi,
            standard_deduction,
            itemized_deduction,
            deduction_method,
            deductions,
            obbba_savings,
            taxable_income,
            tax_before_credits,
            credits,
            total_tax,
            total_payments,
            refund_or_owed,
            effective_rate,
            marginal_rate,
        }
    }

    /// Per-paycheck withholding estimate against this engine's table.
    pub fn estimate_withholding(
        &self,
        request: &WithholdingRequest,
    ) -> WithholdingEstimate {
        withholding::estimate_withholding(self.table, request)
    }

    /// Sum of every income component, with Social Security at the table's
    /// inclusion rate.
    fn gross_income(
        &self,
        input: &TaxpayerInput,
        provisions: &ProvisionConstants,
    ) -> Decimal {
        let income = [
            input.wages,
            input.tip_income,
            input.overtime_wages,
            input.interest,
            input.dividends,
            input.capital_gains,
            input.business_income,
            input.other_income,
        ]
        .map(non_negative);
        let taxable_social_security =
            non_negative(input.social_security) * provisions.social_security_inclusion_rate;

        round_half_up(saturating_sum(
            income.into_iter().chain([taxable_social_security]),
        ))
    }

    /// Above-the-line adjustments. HSA and 401(k) contributions are uncapped.
    fn adjustments(
        &self,
        input: &TaxpayerInput,
        provisions: &ProvisionConstants,
    ) -> Decimal {
        round_half_up(saturating_sum([
            capped(
                input.student_loan_interest,
                provisions.student_loan_interest_cap,
            ),
            capped(input.educator_expenses, provisions.educator_expense_cap),
            non_negative(input.hsa_contributions),
            capped(input.ira_contributions, provisions.ira_contribution_cap),
            non_negative(input.retirement_401k),
        ]))
    }

    fn agi(
        &self,
        gross_income: Decimal,
        adjustments: Decimal,
    ) -> Decimal {
        non_negative(round_half_up(gross_income - adjustments))
    }

    fn taxable_income(
        &self,
        agi: Decimal,
        deduction: Decimal,
        obbba_total: Decimal,
    ) -> Decimal {
        non_negative(round_half_up(
            agi.saturating_sub(deduction).saturating_sub(obbba_total),
        ))
    }

    fn total_tax(
        &self,
        tax_before_credits: Decimal,
        credits: Decimal,
    ) -> Decimal {
        non_negative(round_half_up(tax_before_credits - credits))
    }

    fn total_payments(
        &self,
        input: &TaxpayerInput,
    ) -> Decimal {
        round_half_up(saturating_sum([
            non_negative(input.federal_withholding),
            non_negative(input.estimated_payments),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{BracketSchedule, DeductionMethod, FilingStatus};

    fn table() -> TaxYearTable {
        TaxYearTable::tax_year_2025()
    }

    // =========================================================================
    // construction tests
    // =========================================================================

    #[test]
    fn new_rejects_invalid_table() {
        let mut invalid = table();
        invalid.brackets.head_of_household = BracketSchedule::new(vec![]);

        let result = TaxEngine::new(&invalid);

        assert_eq!(
            result.map(|_| ()),
            Err(TaxTableError::EmptySchedule(FilingStatus::HeadOfHousehold))
        );
    }

    // =========================================================================
    // gross_income tests
    // =========================================================================

    #[test]
    fn gross_income_includes_85_percent_of_social_security() {
        let table = table();
        let engine = TaxEngine::new(&table).unwrap();
        let input = TaxpayerInput {
            wages: dec!(10000),
            social_security: dec!(20000),
            ..Default::default()
        };

        assert_eq!(
            engine.gross_income(&input, &table.provisions),
            dec!(27000.00)
        );
    }

    #[test]
    fn gross_income_sums_every_component() {
        let table = table();
        let engine = TaxEngine::new(&table).unwrap();
        let input = TaxpayerInput {
            wages: dec!(1),
            tip_income: dec!(2),
            overtime_wages: dec!(3),
            interest: dec!(4),
            dividends: dec!(5),
            capital_gains: dec!(6),
            business_income: dec!(7),
            other_income: dec!(8),
            ..Default::default()
        };

        assert_eq!(engine.gross_income(&input, &table.provisions), dec!(36));
    }

    #[test]
    fn gross_income_clamps_negative_components() {
        let table = table();
        let engine = TaxEngine::new(&table).unwrap();
        let input = TaxpayerInput {
            wages: dec!(40000),
            capital_gains: dec!(-3000),
            ..Default::default()
        };

        assert_eq!(engine.gross_income(&input, &table.provisions), dec!(40000));
    }

    // =========================================================================
    // adjustments tests
    // =========================================================================

    #[test]
    fn adjustments_clip_capped_provisions() {
        let table = table();
        let engine = TaxEngine::new(&table).unwrap();
        let input = TaxpayerInput {
            student_loan_interest: dec!(4000),
            educator_expenses: dec!(900),
            hsa_contributions: dec!(4300),
            ira_contributions: dec!(9000),
            retirement_401k: dec!(23500),
            ..Default::default()
        };

        // 2500 + 300 + 4300 + 7000 + 23500
        assert_eq!(engine.adjustments(&input, &table.provisions), dec!(37600));
    }

    #[test]
    fn agi_never_negative() {
        let table = table();
        let engine = TaxEngine::new(&table).unwrap();

        assert_eq!(engine.agi(dec!(5000), dec!(9000)), dec!(0));
    }

    // =========================================================================
    // compute tests
    // =========================================================================

    #[test]
    fn compute_uses_itemized_when_elected_and_larger() {
        let table = table();
        let engine = TaxEngine::new(&table).unwrap();
        let input = TaxpayerInput {
            wages: dec!(120000),
            itemize: true,
            state_local_taxes: dec!(9000),
            property_tax: dec!(7000),
            mortgage_interest: dec!(14000),
            ..Default::default()
        };

        let result = engine.compute(&input);

        assert_eq!(result.itemized_deduction, dec!(30000));
        assert_eq!(result.deduction_method, DeductionMethod::Itemized);
        assert_eq!(result.taxable_income, dec!(90000));
    }

    #[test]
    fn compute_ignores_itemized_when_not_elected() {
        let table = table();
        let engine = TaxEngine::new(&table).unwrap();
        let input = TaxpayerInput {
            wages: dec!(120000),
            mortgage_interest: dec!(50000),
            ..Default::default()
        };

        let result = engine.compute(&input);

        assert_eq!(result.itemized_deduction, dec!(50000));
        assert_eq!(result.deduction_method, DeductionMethod::Standard);
        assert_eq!(result.deductions, dec!(15000));
    }

    #[test]
    fn compute_credits_cannot_push_tax_below_zero() {
        let table = table();
        let engine = TaxEngine::new(&table).unwrap();
        let input = TaxpayerInput {
            wages: dec!(40000),
            children_under_17: 3,
            federal_withholding: dec!(1200),
            ..Default::default()
        };

        let result = engine.compute(&input);

        // taxable 25000 -> 1192.50 + 13075 * 0.12 = 2761.50, CTC 6600
        assert_eq!(result.tax_before_credits, dec!(2761.50));
        assert_eq!(result.total_tax, dec!(0));
        assert_eq!(result.refund_or_owed, dec!(1200));
    }

    #[test]
    fn compute_reports_amount_owed_as_negative() {
        let table = table();
        let engine = TaxEngine::new(&table).unwrap();
        let input = TaxpayerInput {
            wages: dec!(50000),
            estimated_payments: dec!(1000),
            ..Default::default()
        };

        let result = engine.compute(&input);

        assert_eq!(result.total_payments, dec!(1000));
        assert_eq!(result.refund_or_owed, dec!(-2961.50));
        assert_eq!(result.amount_owed(), dec!(2961.50));
    }

    #[test]
    fn compute_marginal_and_effective_rates() {
        let result = compute(&TaxpayerInput {
            wages: dec!(50000),
            ..Default::default()
        });

        assert_eq!(result.marginal_rate, dec!(12));
        // 3961.50 / 50000
        assert_eq!(result.effective_rate, dec!(7.92));
    }

    #[test]
    fn compute_does_not_touch_refund_delivery() {
        let mut input = TaxpayerInput {
            wages: dec!(30000),
            ..Default::default()
        };
        input.refund_delivery.routing_number = "not-a-number".to_string();
        let before = input.clone();

        compute(&input);

        assert_eq!(input, before);
    }

    // =========================================================================
    // withholding tests
    // =========================================================================

    #[test]
    fn engine_estimates_withholding_against_its_table() {
        let mut custom = table();
        custom.standard_deductions.head_of_household = dec!(25000);
        let engine = TaxEngine::new(&custom).expect("adjusted table is valid");
        let request = WithholdingRequest {
            filing_status: FilingStatus::HeadOfHousehold,
            annual_income: dec!(52000),
            ..Default::default()
        };

        let estimate = engine.estimate_withholding(&request);

        // 52000 - 25000 = 27000 -> 1700 + 10000 * 0.12 = 2900
        assert_eq!(estimate.taxable_income, dec!(27000));
        assert_eq!(estimate.estimated_annual_tax, dec!(2900.00));
        // 2900 / 26 = 111.538...
        assert_eq!(estimate.recommended_per_period, dec!(111.54));
    }

    // =========================================================================
    // extreme input tests
    // =========================================================================

    #[test]
    fn compute_saturates_income_at_decimal_max() {
        let result = compute(&TaxpayerInput {
            wages: Decimal::MAX,
            tip_income: Decimal::MAX,
            social_security: Decimal::MAX,
            ..Default::default()
        });

        assert_eq!(result.gross_income, Decimal::MAX);
        assert_eq!(result.agi, Decimal::MAX);
        assert_eq!(result.marginal_rate, dec!(37));
        assert!(result.total_tax > Decimal::ZERO);
        assert_eq!(result.refund_or_owed, -result.total_tax);
    }

    #[test]
    fn compute_saturates_deductions_and_payments() {
        let result = compute(&TaxpayerInput {
            age: 70,
            itemize: true,
            tip_income: Decimal::MAX,
            mortgage_interest: Decimal::MAX,
            charitable_cash: Decimal::MAX,
            hsa_contributions: Decimal::MAX,
            retirement_401k: Decimal::MAX,
            federal_withholding: Decimal::MAX,
            estimated_payments: Decimal::MAX,
            ..Default::default()
        });

        assert_eq!(result.itemized_deduction, Decimal::MAX);
        assert_eq!(result.adjustments, Decimal::MAX);
        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.total_payments, Decimal::MAX);
        assert_eq!(result.refund_or_owed, Decimal::MAX);
    }
}
