//! Progressive bracket tax.
//!
//! Tax is the sum over brackets of `rate × (min(income, upper) − lower)` for
//! every bracket whose lower bound the income exceeds.

use rust_decimal::Decimal;
use tracing::trace;

use crate::BracketSchedule;
use crate::calculations::common::round_half_up;

/// Tax on `taxable_income` under `schedule`, rounded to cents.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::bracket_tax;
/// use tax_core::{FilingStatus, TaxYearTable};
///
/// let table = TaxYearTable::tax_year_2025();
/// let schedule = table.schedule(FilingStatus::Single);
///
/// // 10% × 11,925 + 12% × (35,000 − 11,925)
/// assert_eq!(bracket_tax::tax_on(schedule, dec!(35000)), dec!(3961.50));
/// ```
pub fn tax_on(
    schedule: &BracketSchedule,
    taxable_income: Decimal,
) -> Decimal {
    let mut tax = Decimal::ZERO;

    for bracket in schedule.brackets() {
        if taxable_income <= bracket.lower_bound {
            break;
        }
        let top = bracket
            .upper_bound
            .map_or(taxable_income, |upper| taxable_income.min(upper));
        let slice = top.saturating_sub(bracket.lower_bound);
        trace!(
            lower = %bracket.lower_bound,
            rate = %bracket.rate,
            %slice,
            "taxing bracket slice"
        );
        tax = tax.saturating_add(slice.saturating_mul(bracket.rate));
    }

    round_half_up(tax)
}

/// Rate of the bracket containing `taxable_income`, as a percentage.
///
/// The bracket is the first, from the bottom, whose upper bound is at or
/// above the income. Returns zero for an empty schedule.
pub fn marginal_rate(
    schedule: &BracketSchedule,
    taxable_income: Decimal,
) -> Decimal {
    schedule
        .brackets()
        .iter()
        .find(|bracket| bracket.contains(taxable_income))
        .map_or(Decimal::ZERO, |bracket| {
            (bracket.rate * Decimal::ONE_HUNDRED).normalize()
        })
}
