use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    #[default]
    Single,
    MarriedFilingJointly,
    MarriedFilingSeparately,
    HeadOfHousehold,
}

impl FilingStatus {
    pub fn all() -> &'static [FilingStatus] {
        &[
            FilingStatus::Single,
            FilingStatus::MarriedFilingJointly,
            FilingStatus::MarriedFilingSeparately,
            FilingStatus::HeadOfHousehold,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "S",
            Self::MarriedFilingJointly => "MFJ",
            Self::MarriedFilingSeparately => "MFS",
            Self::HeadOfHousehold => "HOH",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedFilingJointly => "Married Filing Jointly",
            Self::MarriedFilingSeparately => "Married Filing Separately",
            Self::HeadOfHousehold => "Head of Household",
        }
    }

    /// Parses a short code (`S`, `MFJ`, ...) or a snake_case name
    /// (`married_filing_jointly`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "S" | "single" => Some(Self::Single),
            "MFJ" | "married_filing_jointly" => Some(Self::MarriedFilingJointly),
            "MFS" | "married_filing_separately" => Some(Self::MarriedFilingSeparately),
            "HOH" | "head_of_household" => Some(Self::HeadOfHousehold),
            _ => None,
        }
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per filing status.
///
/// Every status owns a field, so a lookup can never miss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByFilingStatus<T> {
    pub single: T,
    pub married_filing_jointly: T,
    pub married_filing_separately: T,
    pub head_of_household: T,
}

impl<T> ByFilingStatus<T> {
    pub fn get(
        &self,
        status: FilingStatus,
    ) -> &T {
        match status {
            FilingStatus::Single => &self.single,
            FilingStatus::MarriedFilingJointly => &self.married_filing_jointly,
            FilingStatus::MarriedFilingSeparately => &self.married_filing_separately,
            FilingStatus::HeadOfHousehold => &self.head_of_household,
        }
    }

    /// Iterates `(status, value)` pairs in [`FilingStatus::all`] order.
    pub fn iter(&self) -> impl Iterator<Item = (FilingStatus, &T)> {
        FilingStatus::all()
            .iter()
            .map(move |status| (*status, self.get(*status)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_codes_and_names() {
        for status in FilingStatus::all() {
            assert_eq!(FilingStatus::parse(status.as_str()), Some(*status));
        }
        assert_eq!(
            FilingStatus::parse("head_of_household"),
            Some(FilingStatus::HeadOfHousehold)
        );
    }

    #[test]
    fn parse_rejects_unknown_and_dropped_codes() {
        assert_eq!(FilingStatus::parse("QSS"), None);
        assert_eq!(FilingStatus::parse("mfj"), None);
        assert_eq!(FilingStatus::parse(""), None);
    }

    #[test]
    fn default_is_single() {
        assert_eq!(FilingStatus::default(), FilingStatus::Single);
    }

    #[test]
    fn by_filing_status_get_and_iter_agree() {
        let table = ByFilingStatus {
            single: 1,
            married_filing_jointly: 2,
            married_filing_separately: 3,
            head_of_household: 4,
        };

        assert_eq!(*table.get(FilingStatus::MarriedFilingSeparately), 3);
        let collected: Vec<_> = table.iter().map(|(_, v)| *v).collect();
        assert_eq!(collected, vec![1, 2, 3, 4]);
    }
}
