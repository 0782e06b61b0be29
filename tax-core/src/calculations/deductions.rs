//! Standard, itemized and OBBBA special-provision deductions.

use rust_decimal::Decimal;

use crate::calculations::common::{capped, non_negative, round_half_up, saturating_sum};
use crate::{DeductionMethod, FilingStatus, ObbbaSavings, ProvisionConstants, TaxpayerInput};

fn is_senior(
    age: u32,
    provisions: &ProvisionConstants,
) -> bool {
    age >= provisions.senior_age_threshold
}

/// Tips, overtime and senior deductions.
///
/// These are computed regardless of the standard/itemized choice and reduce
/// taxable income on top of it.
pub fn obbba_savings(
    input: &TaxpayerInput,
    provisions: &ProvisionConstants,
) -> ObbbaSavings {
    let tips_deduction = capped(input.tip_income, provisions.tips_deduction_cap);
    let overtime_deduction = capped(input.overtime_wages, provisions.overtime_deduction_cap);
    let senior_deduction = if is_senior(input.age, provisions) {
        provisions.senior_deduction
    } else {
        Decimal::ZERO
    };

    ObbbaSavings {
        tips_deduction: round_half_up(tips_deduction),
        overtime_deduction: round_half_up(overtime_deduction),
        senior_deduction: round_half_up(senior_deduction),
        total: round_half_up(saturating_sum([
            tips_deduction,
            overtime_deduction,
            senior_deduction,
        ])),
    }
}

/// Standard deduction for the filing status plus one senior addition for
/// the filer and one for a jointly filing spouse, each checked on its own.
pub fn standard_deduction(
    input: &TaxpayerInput,
    base: Decimal,
    provisions: &ProvisionConstants,
) -> Decimal {
    let mut deduction = base;

    if is_senior(input.age, provisions) {
        deduction = deduction.saturating_add(provisions.senior_additional_standard_deduction);
    }
    if input.filing_status == FilingStatus::MarriedFilingJointly
        && is_senior(input.spouse_age, provisions)
    {
        deduction = deduction.saturating_add(provisions.senior_additional_standard_deduction);
    }

    round_half_up(deduction)
}

/// Itemized deduction total.
///
/// SALT is capped, and medical expenses count only above the AGI floor.
pub fn itemized_deduction(
    input: &TaxpayerInput,
    agi: Decimal,
    provisions: &ProvisionConstants,
) -> Decimal {
    let salt = capped(
        saturating_sum([
            non_negative(input.state_local_taxes),
            non_negative(input.property_tax),
        ]),
        provisions.salt_cap,
    );
    let medical_floor = round_half_up(agi * provisions.medical_expense_agi_floor);
    let medical = non_negative(non_negative(input.medical_expenses) - medical_floor);

    round_half_up(saturating_sum([
        salt,
        non_negative(input.mortgage_interest),
        non_negative(input.charitable_cash),
        non_negative(input.charitable_non_cash),
        medical,
    ]))
}

/// Picks the deduction to take.
///
/// Without the itemize flag the standard deduction always applies. With it,
/// the itemized total is used only when it is strictly larger.
pub fn choose_deduction(
    itemize: bool,
    itemized: Decimal,
    standard: Decimal,
) -> (Decimal, DeductionMethod) {
    if itemize && itemized > standard {
        (itemized, DeductionMethod::Itemized)
    } else {
        (standard, DeductionMethod::Standard)
    }
}
