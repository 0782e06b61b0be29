use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A contiguous income range taxed at a single marginal rate.
///
/// `upper_bound` is `None` for the top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        lower_bound: Decimal,
        upper_bound: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate,
        }
    }

    /// Returns `true` if `income` falls at or below this bracket's upper bound.
    pub fn contains(
        &self,
        income: Decimal,
    ) -> bool {
        self.upper_bound.is_none_or(|upper| income <= upper)
    }
}

/// The ordered brackets that apply to one filing status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BracketSchedule {
    brackets: Vec<TaxBracket>,
}

impl BracketSchedule {
    pub fn new(brackets: Vec<TaxBracket>) -> Self {
        Self { brackets }
    }

    /// Builds a schedule from `(upper_bound, rate)` pairs, where each
    /// bracket starts at the previous upper bound and the last pair's upper
    /// bound is `None`.
    pub fn from_thresholds(thresholds: &[(Option<Decimal>, Decimal)]) -> Self {
        let mut lower = Decimal::ZERO;
        let brackets = thresholds
            .iter()
            .map(|&(upper, rate)| {
                let bracket = TaxBracket::new(lower, upper, rate);
                if let Some(upper) = upper {
                    lower = upper;
                }
                bracket
            })
            .collect();
        Self { brackets }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }
}
