//! Plain-text listings of a tax-year table.

use std::fmt;

use rust_decimal::Decimal;
use tax_core::{FilingStatus, TaxYearTable};

fn percent(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

fn row(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    value: impl fmt::Display,
) -> fmt::Result {
    writeln!(f, "  {label:<30}{:>12}", value.to_string())
}

/// Bracket schedules for one filing status, or for all of them.
pub struct BracketReport<'a> {
    table: &'a TaxYearTable,
    status: Option<FilingStatus>,
}

impl<'a> BracketReport<'a> {
    pub fn new(
        table: &'a TaxYearTable,
        status: Option<FilingStatus>,
    ) -> Self {
        Self { table, status }
    }
}

impl fmt::Display for BracketReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let schedules = self
            .table
            .brackets
            .iter()
            .filter(|(status, _)| self.status.is_none_or(|wanted| wanted == *status));

        for (index, (status, schedule)) in schedules.enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{status} ({}), tax year {}", status.as_str(), self.table.tax_year)?;
            writeln!(f, "  {:>14}  {:>14}  {:>6}", "Over", "Not over", "Rate")?;
            for bracket in schedule.brackets() {
                let upper = bracket
                    .upper_bound
                    .map_or_else(|| "-".to_string(), |upper| upper.to_string());
                writeln!(
                    f,
                    "  {:>14}  {:>14}  {:>6}",
                    bracket.lower_bound.to_string(),
                    upper,
                    percent(bracket.rate)
                )?;
            }
        }
        Ok(())
    }
}

/// Standard deductions and every provision constant of a table.
pub struct ProvisionReport<'a>(pub &'a TaxYearTable);

impl fmt::Display for ProvisionReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let table = self.0;
        let provisions = &table.provisions;

        writeln!(f, "Tax year {}", table.tax_year)?;

        writeln!(f)?;
        writeln!(f, "Standard deductions")?;
        for (status, amount) in table.standard_deductions.iter() {
            row(f, status.label(), amount)?;
        }
        row(
            f,
            &format!("Senior addition ({}+)", provisions.senior_age_threshold),
            provisions.senior_additional_standard_deduction,
        )?;

        writeln!(f)?;
        writeln!(f, "OBBBA provisions")?;
        row(f, "Tips deduction cap", provisions.tips_deduction_cap)?;
        row(f, "Overtime deduction cap", provisions.overtime_deduction_cap)?;
        row(f, "Senior deduction", provisions.senior_deduction)?;
        row(f, "Child tax credit per child", provisions.child_tax_credit_per_child)?;
        row(f, "SALT cap", provisions.salt_cap)?;

        writeln!(f)?;
        writeln!(f, "Adjustments and income rules")?;
        row(f, "Student loan interest cap", provisions.student_loan_interest_cap)?;
        row(f, "Educator expense cap", provisions.educator_expense_cap)?;
        row(f, "IRA contribution cap", provisions.ira_contribution_cap)?;
        row(
            f,
            "Social Security included",
            percent(provisions.social_security_inclusion_rate),
        )?;
        row(
            f,
            "Medical expense AGI floor",
            percent(provisions.medical_expense_agi_floor),
        )?;

        let eic = &provisions.earned_income_credit;
        writeln!(f)?;
        writeln!(f, "Earned income credit (AGI below {})", eic.agi_ceiling)?;
        writeln!(f, "  {:<10}{:>14}{:>8}{:>12}", "Children", "Earned below", "Rate", "Max credit")?;
        let last = eic.tiers.len().saturating_sub(1);
        for (children, tier) in eic.tiers.iter().enumerate() {
            let label = if children == last && children > 0 {
                format!("{children}+")
            } else {
                children.to_string()
            };
            writeln!(
                f,
                "  {:<10}{:>14}{:>8}{:>12}",
                label,
                tier.earned_income_threshold.to_string(),
                percent(tier.rate),
                tier.max_credit.to_string()
            )?;
        }
        Ok(())
    }
}
