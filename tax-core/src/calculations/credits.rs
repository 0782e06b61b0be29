//! Child tax credit and the flat-rate earned income credit.

use rust_decimal::Decimal;

use crate::calculations::common::{non_negative, round_half_up, saturating_sum};
use crate::{Credits, FilingStatus, ProvisionConstants, TaxpayerInput};

/// Per-child credit for each qualifying child under 17. No phase-out.
pub fn child_tax_credit(
    children_under_17: u32,
    provisions: &ProvisionConstants,
) -> Decimal {
    round_half_up(
        Decimal::from(children_under_17)
            .saturating_mul(provisions.child_tax_credit_per_child),
    )
}

/// Wages, tips, overtime and business income.
pub fn earned_income(input: &TaxpayerInput) -> Decimal {
    saturating_sum(
        [
            input.wages,
            input.tip_income,
            input.overtime_wages,
            input.business_income,
        ]
        .map(non_negative),
    )
}

/// Flat-rate earned income credit.
///
/// Not available when married filing separately or once AGI reaches the
/// table's ceiling. The tier for the number of children under 17 pays
/// `rate × earned income`, up to its maximum, while earned income stays
/// below the tier's threshold.
pub fn earned_income_credit(
    input: &TaxpayerInput,
    agi: Decimal,
    provisions: &ProvisionConstants,
) -> Decimal {
    let table = &provisions.earned_income_credit;

    if input.filing_status == FilingStatus::MarriedFilingSeparately || agi >= table.agi_ceiling {
        return Decimal::ZERO;
    }

    let earned = earned_income(input);
    if earned <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    match table.tier_for(input.children_under_17) {
        Some(tier) if earned < tier.earned_income_threshold => {
            round_half_up((earned * tier.rate).min(tier.max_credit))
        }
        _ => Decimal::ZERO,
    }
}

pub fn credits(
    input: &TaxpayerInput,
    agi: Decimal,
    provisions: &ProvisionConstants,
) -> Credits {
    let child_tax_credit = child_tax_credit(input.children_under_17, provisions);
    let earned_income_credit = earned_income_credit(input, agi, provisions);

    Credits {
        child_tax_credit,
        earned_income_credit,
        total: round_half_up(child_tax_credit.saturating_add(earned_income_credit)),
    }
}
