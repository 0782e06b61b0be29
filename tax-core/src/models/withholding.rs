use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::FilingStatus;

/// How often a paycheck is issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    Weekly,
    #[default]
    Biweekly,
    Semimonthly,
    Monthly,
}

impl PayFrequency {
    pub fn all() -> &'static [PayFrequency] {
        &[
            PayFrequency::Weekly,
            PayFrequency::Biweekly,
            PayFrequency::Semimonthly,
            PayFrequency::Monthly,
        ]
    }

    pub fn periods_per_year(&self) -> u32 {
        match self {
            PayFrequency::Weekly => 52,
            PayFrequency::Biweekly => 26,
            PayFrequency::Semimonthly => 24,
            PayFrequency::Monthly => 12,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PayFrequency::Weekly => "weekly",
            PayFrequency::Biweekly => "biweekly",
            PayFrequency::Semimonthly => "semimonthly",
            PayFrequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for PayFrequency {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pay frequency '{0}' (expected weekly, biweekly, semimonthly or monthly)")]
pub struct UnknownPayFrequency(pub String);

impl FromStr for PayFrequency {
    type Err = UnknownPayFrequency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        PayFrequency::all()
            .iter()
            .copied()
            .find(|frequency| frequency.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownPayFrequency(s.to_string()))
    }
}

/// Inputs to the W-4 withholding estimate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WithholdingRequest {
    pub filing_status: FilingStatus,
    pub annual_income: Decimal,
    pub pay_frequency: PayFrequency,
    /// 401(k), HSA and other payroll deductions taken before tax.
    pub pre_tax_deductions: Decimal,
    /// Extra amount the employee asks to have withheld each period.
    pub additional_withholding: Decimal,
}

/// Recommended withholding per paycheck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingEstimate {
    pub annual_income: Decimal,
    pub taxable_income: Decimal,
    pub estimated_annual_tax: Decimal,
    pub pay_frequency: PayFrequency,
    pub pay_periods: u32,
    pub recommended_per_period: Decimal,
    pub additional_withholding: Decimal,
    pub total_per_period: Decimal,
}

impl fmt::Display for WithholdingEstimate {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Annual income:       {:>12}", self.annual_income)?;
        writeln!(f, "Taxable income:      {:>12}", self.taxable_income)?;
        writeln!(f, "Estimated tax:       {:>12}", self.estimated_annual_tax)?;
        writeln!(
            f,
            "Pay periods:         {:>12}",
            format!("{} ({})", self.pay_periods, self.pay_frequency)
        )?;
        writeln!(f, "Per period:          {:>12}", self.recommended_per_period)?;
        writeln!(f, "Additional:          {:>12}", self.additional_withholding)?;
        write!(f, "Total per period:    {:>12}", self.total_per_period)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn periods_per_year() {
        let periods: Vec<u32> = PayFrequency::all()
            .iter()
            .map(PayFrequency::periods_per_year)
            .collect();

        assert_eq!(periods, vec![52, 26, 24, 12]);
    }

    #[test]
    fn default_is_biweekly() {
        assert_eq!(PayFrequency::default(), PayFrequency::Biweekly);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Weekly".parse(), Ok(PayFrequency::Weekly));
        assert_eq!(" MONTHLY ".parse(), Ok(PayFrequency::Monthly));
        assert_eq!("semimonthly".parse(), Ok(PayFrequency::Semimonthly));
    }

    #[test]
    fn parse_rejects_unknown_frequency() {
        assert_eq!(
            "daily".parse::<PayFrequency>(),
            Err(UnknownPayFrequency("daily".to_string()))
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        for frequency in PayFrequency::all() {
            assert_eq!(frequency.to_string().parse(), Ok(*frequency));
        }
    }
}
