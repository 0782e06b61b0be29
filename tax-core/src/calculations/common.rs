//! Shared helpers for the calculation pipeline.
//!
//! Every monetary step of the pipeline is rounded to cents with
//! [`round_half_up`], and every caller-supplied amount passes through
//! [`non_negative`] before use. Caller amounts are added with
//! [`saturating_sum`], so no input can overflow the pipeline.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps an amount to zero or above.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::non_negative;
///
/// assert_eq!(non_negative(dec!(-40.00)), dec!(0));
/// assert_eq!(non_negative(dec!(40.00)), dec!(40.00));
/// ```
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Clips `amount` to `cap`, treating negative amounts as zero.
pub fn capped(
    amount: Decimal,
    cap: Decimal,
) -> Decimal {
    non_negative(amount).min(cap)
}

/// Adds amounts, stopping at [`Decimal::MAX`] instead of overflowing.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::saturating_sum;
///
/// assert_eq!(saturating_sum([dec!(1.50), dec!(2.25)]), dec!(3.75));
/// assert_eq!(saturating_sum([Decimal::MAX, dec!(1)]), Decimal::MAX);
/// ```
pub fn saturating_sum(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// `part / whole × 100`, rounded to cents, or zero when `whole` is zero.
pub fn percentage(
    part: Decimal,
    whole: Decimal,
) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    round_half_up(part / whole * Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(2769.005)), dec!(2769.01));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
    }

    #[test]
    fn round_half_up_handles_large_values() {
        assert_eq!(round_half_up(dec!(999999.999)), dec!(1000000.00));
    }

    // =========================================================================
    // non_negative / capped tests
    // =========================================================================

    #[test]
    fn non_negative_clamps_negative_to_zero() {
        assert_eq!(non_negative(dec!(-0.01)), dec!(0));
    }

    #[test]
    fn non_negative_keeps_positive() {
        assert_eq!(non_negative(dec!(0.01)), dec!(0.01));
    }

    #[test]
    fn capped_clips_to_cap() {
        assert_eq!(capped(dec!(1000000), dec!(25000)), dec!(25000));
    }

    #[test]
    fn capped_keeps_amount_under_cap() {
        assert_eq!(capped(dec!(10000), dec!(25000)), dec!(10000));
    }

    #[test]
    fn capped_treats_negative_as_zero() {
        assert_eq!(capped(dec!(-500), dec!(2500)), dec!(0));
    }

    // =========================================================================
    // saturating_sum tests
    // =========================================================================

    #[test]
    fn saturating_sum_of_nothing_is_zero() {
        assert_eq!(saturating_sum([]), dec!(0));
    }

    #[test]
    fn saturating_sum_adds_normally_in_range() {
        assert_eq!(saturating_sum([dec!(0.10), dec!(0.20), dec!(99.70)]), dec!(100.00));
    }

    #[test]
    fn saturating_sum_stops_at_max() {
        assert_eq!(saturating_sum([Decimal::MAX, Decimal::MAX, dec!(5)]), Decimal::MAX);
    }

    // =========================================================================
    // percentage tests
    // =========================================================================

    #[test]
    fn percentage_of_zero_whole_is_zero() {
        assert_eq!(percentage(dec!(100), dec!(0)), dec!(0));
    }

    #[test]
    fn percentage_rounds_to_cents() {
        // 3961.50 / 50000 × 100 = 7.923
        assert_eq!(percentage(dec!(3961.50), dec!(50000)), dec!(7.92));
    }
}
