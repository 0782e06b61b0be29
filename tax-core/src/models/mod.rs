mod filing_status;
mod provisions;
mod tax_bracket;
mod tax_calculation;
mod tax_year_table;
mod taxpayer_input;
mod withholding;

pub use filing_status::{ByFilingStatus, FilingStatus};
pub use provisions::{EarnedIncomeCreditTable, EarnedIncomeCreditTier, ProvisionConstants};
pub use tax_bracket::{BracketSchedule, TaxBracket};
pub use tax_calculation::{Credits, DeductionMethod, ObbbaSavings, TaxCalculation};
pub use tax_year_table::{TaxTableError, TaxYearTable};
pub use taxpayer_input::{RefundDelivery, TaxpayerInput};
pub use withholding::{PayFrequency, UnknownPayFrequency, WithholdingEstimate, WithholdingRequest};
