//! Normalization of raw form values into engine-ready numbers.
//!
//! The calculation engine assumes clean, non-negative numbers. Anything typed
//! into a form or read from a spreadsheet goes through here first.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;
use tracing::warn;

/// Largest amount accepted from a form: one trillion.
// 1_000_000_000_000 = 0xE8_D4A5_1000, split into 32-bit parts (const-constructible).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Currency symbols, thousands separators and whitespace.
static DECORATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,$]").expect("decoration pattern is valid"));

/// Error returned when a string cannot be parsed as an amount.
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseAmountError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

fn strip_decoration(s: &str) -> String {
    DECORATION.replace_all(s, "").into_owned()
}

/// Parses a currency-formatted string into a [`Decimal`].
///
/// Accepts `$` signs, comma thousands separators, surrounding whitespace
/// and accounting-style negatives (`(1,200.00)`). Empty input is zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_data::parse_amount;
///
/// assert_eq!(parse_amount("$1,234.56").unwrap(), dec!(1234.56));
/// assert_eq!(parse_amount("(200)").unwrap(), dec!(-200));
/// assert_eq!(parse_amount("").unwrap(), dec!(0));
/// ```
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let stripped = strip_decoration(s);
    if stripped.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let (digits, negate) = match stripped
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
    {
        Some(inner) => (inner, true),
        None => (stripped.as_str(), false),
    };

    let value: Decimal = digits.parse().map_err(|e| ParseAmountError {
        input: s.to_string(),
        source: e,
    })?;

    Ok(if negate { -value } else { value })
}

/// Lenient amount parsing for engine input.
///
/// Unparseable input becomes zero (logged), and negatives are clamped to
/// zero. Amounts above [`MAX_AMOUNT`] are out of range and also become zero.
pub fn normalize_amount(s: &str) -> Decimal {
    match parse_amount(s) {
        Ok(value) if value < Decimal::ZERO => {
            warn!(input = %s, "negative amount clamped to zero");
            Decimal::ZERO
        }
        Ok(value) if value > MAX_AMOUNT => {
            warn!(input = %s, "amount out of range treated as zero");
            Decimal::ZERO
        }
        Ok(value) => value,
        Err(e) => {
            warn!(input = %s, "invalid amount treated as zero: {}", e);
            Decimal::ZERO
        }
    }
}

/// Lenient whole-number parsing for ages and dependent counts.
///
/// Empty, negative or non-numeric input becomes zero. Fractions are
/// truncated.
pub fn normalize_count(s: &str) -> u32 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0;
    }
    match trimmed.parse::<Decimal>() {
        Ok(value) if value >= Decimal::ZERO => value.trunc().to_u32().unwrap_or_else(|| {
            warn!(input = %s, "count out of range treated as zero");
            0
        }),
        _ => {
            warn!(input = %s, "invalid count treated as zero");
            0
        }
    }
}
