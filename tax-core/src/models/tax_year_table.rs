//! Versioned tax-year configuration.
//!
//! A [`TaxYearTable`] bundles everything the calculation pipeline reads for a
//! given year: bracket schedules, standard deductions and the provision
//! constants. Supporting another year means building another table.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::models::{
    BracketSchedule, ByFilingStatus, EarnedIncomeCreditTable, EarnedIncomeCreditTier,
    FilingStatus, ProvisionConstants,
};

/// Errors describing an inconsistent [`TaxYearTable`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxTableError {
    #[error("{0} bracket schedule is empty")]
    EmptySchedule(FilingStatus),

    #[error("{status} bracket schedule starts at {lower_bound}, expected 0")]
    ScheduleDoesNotStartAtZero {
        status: FilingStatus,
        lower_bound: Decimal,
    },

    #[error("{status} bracket {index} starts at {found}, expected {expected}")]
    BracketGap {
        status: FilingStatus,
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("{status} bracket {index} has an upper bound not above its lower bound")]
    EmptyBracket { status: FilingStatus, index: usize },

    #[error("{status} bracket {index} is unbounded but is not the last bracket")]
    UnboundedBeforeLast { status: FilingStatus, index: usize },

    #[error("{0} top bracket must be unbounded")]
    LastBracketBounded(FilingStatus),

    #[error("{status} bracket {index} rate must be between 0 and 1, got {rate}")]
    InvalidRate {
        status: FilingStatus,
        index: usize,
        rate: Decimal,
    },

    #[error("{status} bracket {index} rate is lower than the bracket below it")]
    DecreasingRate { status: FilingStatus, index: usize },

    #[error("{status} standard deduction must be non-negative, got {amount}")]
    NegativeStandardDeduction {
        status: FilingStatus,
        amount: Decimal,
    },

    #[error("{name} must be non-negative, got {amount}")]
    NegativeProvision { name: &'static str, amount: Decimal },

    #[error("{name} must be between 0 and 1, got {rate}")]
    InvalidProvisionRate { name: &'static str, rate: Decimal },

    #[error("earned income credit table has no tiers")]
    NoEarnedIncomeCreditTiers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearTable {
    pub tax_year: i32,
    pub brackets: ByFilingStatus<BracketSchedule>,
    pub standard_deductions: ByFilingStatus<Decimal>,
    pub provisions: ProvisionConstants,
}

impl TaxYearTable {
    /// The built-in 2025 table.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::{FilingStatus, TaxYearTable};
    ///
    /// let table = TaxYearTable::tax_year_2025();
    ///
    /// assert_eq!(table.validate(), Ok(()));
    /// assert_eq!(table.standard_deduction(FilingStatus::HeadOfHousehold), dec!(22500));
    /// ```
    pub fn tax_year_2025() -> Self {
        Self {
            tax_year: 2025,
            brackets: ByFilingStatus {
                single: schedule_2025([
                    dec!(11925),
                    dec!(48475),
                    dec!(103350),
                    dec!(197300),
                    dec!(250525),
                    dec!(626350),
                ]),
                married_filing_jointly: schedule_2025([
                    dec!(23850),
                    dec!(96950),
                    dec!(206700),
                    dec!(394600),
                    dec!(501050),
                    dec!(751600),
                ]),
                married_filing_separately: schedule_2025([
                    dec!(11925),
                    dec!(48475),
                    dec!(103350),
                    dec!(197300),
                    dec!(250525),
                    dec!(375800),
                ]),
                head_of_household: schedule_2025([
                    dec!(17000),
                    dec!(64850),
                    dec!(103350),
                    dec!(197300),
                    dec!(250500),
                    dec!(626350),
                ]),
            },
            standard_deductions: ByFilingStatus {
                single: dec!(15000),
                married_filing_jointly: dec!(30000),
                married_filing_separately: dec!(15000),
                head_of_household: dec!(22500),
            },
            provisions: ProvisionConstants {
                child_tax_credit_per_child: dec!(2200),
                tips_deduction_cap: dec!(25000),
                overtime_deduction_cap: dec!(10000),
                senior_deduction: dec!(6000),
                senior_additional_standard_deduction: dec!(1650),
                senior_age_threshold: 65,
                salt_cap: dec!(40000),
                student_loan_interest_cap: dec!(2500),
                educator_expense_cap: dec!(300),
                ira_contribution_cap: dec!(7000),
                social_security_inclusion_rate: dec!(0.85),
                medical_expense_agi_floor: dec!(0.075),
                earned_income_credit: EarnedIncomeCreditTable {
                    agi_ceiling: dec!(63398),
                    tiers: vec![
                        eic_tier(dec!(17640), dec!(0.0765), dec!(632)),
                        eic_tier(dec!(46560), dec!(0.34), dec!(4213)),
                        eic_tier(dec!(52918), dec!(0.40), dec!(6960)),
                        eic_tier(dec!(56838), dec!(0.45), dec!(7830)),
                    ],
                },
            },
        }
    }

    pub fn schedule(
        &self,
        status: FilingStatus,
    ) -> &BracketSchedule {
        self.brackets.get(status)
    }

    pub fn standard_deduction(
        &self,
        status: FilingStatus,
    ) -> Decimal {
        *self.standard_deductions.get(status)
    }

    /// Checks every schedule and constant in the table.
    ///
    /// # Errors
    ///
    /// Returns the first [`TaxTableError`] found.
    pub fn validate(&self) -> Result<(), TaxTableError> {
        let result = self.check();
        if let Err(err) = &result {
            warn!(tax_year = self.tax_year, %err, "tax year table failed validation");
        }
        result
    }

    fn check(&self) -> Result<(), TaxTableError> {
        for (status, schedule) in self.brackets.iter() {
            validate_schedule(status, schedule)?;
        }

        for (status, amount) in self.standard_deductions.iter() {
            if *amount < Decimal::ZERO {
                return Err(TaxTableError::NegativeStandardDeduction {
                    status,
                    amount: *amount,
                });
            }
        }

        validate_provisions(&self.provisions)
    }
}

fn schedule_2025(upper_bounds: [Decimal; 6]) -> BracketSchedule {
    let rates = [
        dec!(0.10),
        dec!(0.12),
        dec!(0.22),
        dec!(0.24),
        dec!(0.32),
        dec!(0.35),
    ];
    let mut thresholds: Vec<(Option<Decimal>, Decimal)> = upper_bounds
        .into_iter()
        .zip(rates)
        .map(|(upper, rate)| (Some(upper), rate))
        .collect();
    thresholds.push((None, dec!(0.37)));
    BracketSchedule::from_thresholds(&thresholds)
}

fn eic_tier(
    earned_income_threshold: Decimal,
    rate: Decimal,
    max_credit: Decimal,
) -> EarnedIncomeCreditTier {
    EarnedIncomeCreditTier {
        earned_income_threshold,
        rate,
        max_credit,
    }
}

/// Brackets must start at zero, be contiguous, end unbounded, and carry
/// non-decreasing rates in [0, 1].
fn validate_schedule(
    status: FilingStatus,
    schedule: &BracketSchedule,
) -> Result<(), TaxTableError> {
    let brackets = schedule.brackets();
    let first = brackets
        .first()
        .ok_or(TaxTableError::EmptySchedule(status))?;

    if first.lower_bound != Decimal::ZERO {
        return Err(TaxTableError::ScheduleDoesNotStartAtZero {
            status,
            lower_bound: first.lower_bound,
        });
    }

    let last_index = brackets.len() - 1;
    let mut expected_lower = Decimal::ZERO;
    let mut previous_rate = Decimal::ZERO;

    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.lower_bound != expected_lower {
            return Err(TaxTableError::BracketGap {
                status,
                index,
                expected: expected_lower,
                found: bracket.lower_bound,
            });
        }

        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(TaxTableError::InvalidRate {
                status,
                index,
                rate: bracket.rate,
            });
        }
        if bracket.rate < previous_rate {
            return Err(TaxTableError::DecreasingRate { status, index });
        }
        previous_rate = bracket.rate;

        match bracket.upper_bound {
            Some(_) if index == last_index => {
                return Err(TaxTableError::LastBracketBounded(status));
            }
            Some(upper) if upper <= bracket.lower_bound => {
                return Err(TaxTableError::EmptyBracket { status, index });
            }
            Some(upper) => expected_lower = upper,
            None if index != last_index => {
                return Err(TaxTableError::UnboundedBeforeLast { status, index });
            }
            None => {}
        }
    }

    Ok(())
}

fn validate_provisions(provisions: &ProvisionConstants) -> Result<(), TaxTableError> {
    let amounts = [
        ("child_tax_credit_per_child", provisions.child_tax_credit_per_child),
        ("tips_deduction_cap", provisions.tips_deduction_cap),
        ("overtime_deduction_cap", provisions.overtime_deduction_cap),
        ("senior_deduction", provisions.senior_deduction),
        (
            "senior_additional_standard_deduction",
            provisions.senior_additional_standard_deduction,
        ),
        ("salt_cap", provisions.salt_cap),
        ("student_loan_interest_cap", provisions.student_loan_interest_cap),
        ("educator_expense_cap", provisions.educator_expense_cap),
        ("ira_contribution_cap", provisions.ira_contribution_cap),
        (
            "earned_income_credit.agi_ceiling",
            provisions.earned_income_credit.agi_ceiling,
        ),
    ];
    for (name, amount) in amounts {
        if amount < Decimal::ZERO {
            return Err(TaxTableError::NegativeProvision { name, amount });
        }
    }

    let rates = [
        (
            "social_security_inclusion_rate",
            provisions.social_security_inclusion_rate,
        ),
        ("medical_expense_agi_floor", provisions.medical_expense_agi_floor),
    ];
    for (name, rate) in rates {
        check_rate(name, rate)?;
    }

    let tiers = &provisions.earned_income_credit.tiers;
    if tiers.is_empty() {
        return Err(TaxTableError::NoEarnedIncomeCreditTiers);
    }
    for tier in tiers {
        check_rate("earned_income_credit.rate", tier.rate)?;
        if tier.earned_income_threshold < Decimal::ZERO {
            return Err(TaxTableError::NegativeProvision {
                name: "earned_income_credit.earned_income_threshold",
                amount: tier.earned_income_threshold,
            });
        }
        if tier.max_credit < Decimal::ZERO {
            return Err(TaxTableError::NegativeProvision {
                name: "earned_income_credit.max_credit",
                amount: tier.max_credit,
            });
        }
    }

    Ok(())
}

fn check_rate(
    name: &'static str,
    rate: Decimal,
) -> Result<(), TaxTableError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(TaxTableError::InvalidProvisionRate { name, rate });
    }
    Ok(())
}
