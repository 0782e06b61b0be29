//! W-4 withholding estimate.
//!
//! A paycheck-level approximation, not a full return: annual income less
//! pre-tax payroll deductions and the base standard deduction is taxed on
//! the bracket schedule, then spread evenly over the pay periods. Credits,
//! OBBBA deductions and senior additions are ignored.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::bracket_tax;
use crate::calculations::common::{non_negative, round_half_up};
use crate::{TaxYearTable, WithholdingEstimate, WithholdingRequest};

pub fn estimate_withholding(
    table: &TaxYearTable,
    request: &WithholdingRequest,
) -> WithholdingEstimate {
    let annual_income = round_half_up(non_negative(request.annual_income));
    let taxable_income = non_negative(round_half_up(
        annual_income
            .saturating_sub(non_negative(request.pre_tax_deductions))
            .saturating_sub(table.standard_deduction(request.filing_status)),
    ));
    let estimated_annual_tax =
        bracket_tax::tax_on(table.schedule(request.filing_status), taxable_income);

    let pay_periods = request.pay_frequency.periods_per_year();
    let recommended_per_period = round_half_up(estimated_annual_tax / Decimal::from(pay_periods));
    let additional_withholding = round_half_up(non_negative(request.additional_withholding));
    let total_per_period =
        round_half_up(recommended_per_period.saturating_add(additional_withholding));

    debug!(
        filing_status = request.filing_status.as_str(),
        %taxable_income,
        %estimated_annual_tax,
        pay_periods,
        %total_per_period,
        "estimated withholding"
    );

    WithholdingEstimate {
        annual_income,
        taxable_income,
        estimated_annual_tax,
        pay_frequency: request.pay_frequency,
        pay_periods,
        recommended_per_period,
        additional_withholding,
        total_per_period,
    }
}
