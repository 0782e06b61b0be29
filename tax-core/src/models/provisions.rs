use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Year-specific amounts for the above-the-line adjustments, the OBBBA
/// provisions, and the credits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionConstants {
    /// Child tax credit per qualifying child under 17.
    pub child_tax_credit_per_child: Decimal,

    /// Maximum tax-free tip income.
    pub tips_deduction_cap: Decimal,

    /// Maximum tax-free overtime wages.
    pub overtime_deduction_cap: Decimal,

    /// Flat senior deduction for a filer at or above `senior_age_threshold`.
    pub senior_deduction: Decimal,

    /// Additional standard deduction per person at or above
    /// `senior_age_threshold` (filer, and spouse when filing jointly).
    pub senior_additional_standard_deduction: Decimal,

    pub senior_age_threshold: u32,

    /// Cap on state, local and property taxes combined.
    pub salt_cap: Decimal,

    pub student_loan_interest_cap: Decimal,
    pub educator_expense_cap: Decimal,
    pub ira_contribution_cap: Decimal,

    /// Share of Social Security benefits included in gross income.
    pub social_security_inclusion_rate: Decimal,

    /// Medical expenses are deductible only above this share of AGI.
    pub medical_expense_agi_floor: Decimal,

    pub earned_income_credit: EarnedIncomeCreditTable,
}

/// Flat-rate earned income credit tiers.
///
/// `tiers[n]` applies to `n` qualifying children; the last tier covers
/// every count at or above its index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarnedIncomeCreditTable {
    /// No credit once AGI reaches this amount.
    pub agi_ceiling: Decimal,
    pub tiers: Vec<EarnedIncomeCreditTier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarnedIncomeCreditTier {
    /// Credit applies only while earned income is below this amount.
    pub earned_income_threshold: Decimal,
    pub rate: Decimal,
    pub max_credit: Decimal,
}

impl EarnedIncomeCreditTable {
    /// Returns the tier for `children` qualifying children, or `None` if the
    /// table has no tiers.
    pub fn tier_for(
        &self,
        children: u32,
    ) -> Option<&EarnedIncomeCreditTier> {
        let last = self.tiers.len().checked_sub(1)?;
        let index = usize::try_from(children).map_or(last, |n| n.min(last));
        self.tiers.get(index)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn tier(max_credit: Decimal) -> EarnedIncomeCreditTier {
        EarnedIncomeCreditTier {
            earned_income_threshold: dec!(10000),
            rate: dec!(0.10),
            max_credit,
        }
    }

    #[test]
    fn tier_for_clamps_to_last_tier() {
        let table = EarnedIncomeCreditTable {
            agi_ceiling: dec!(50000),
            tiers: vec![tier(dec!(1)), tier(dec!(2)), tier(dec!(3))],
        };

        assert_eq!(table.tier_for(0).map(|t| t.max_credit), Some(dec!(1)));
        assert_eq!(table.tier_for(2).map(|t| t.max_credit), Some(dec!(3)));
        assert_eq!(table.tier_for(9).map(|t| t.max_credit), Some(dec!(3)));
    }

    #[test]
    fn tier_for_empty_table_is_none() {
        let table = EarnedIncomeCreditTable {
            agi_ceiling: dec!(50000),
            tiers: vec![],
        };

        assert_eq!(table.tier_for(1), None);
    }
}
