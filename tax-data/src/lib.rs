//! Caller-side input handling for the tax engine: lenient normalization of
//! raw form values, taxpayer CSV records, and tax-year table files.

pub mod amount;
pub mod table_loader;
pub mod taxpayer_loader;

pub use amount::{MAX_AMOUNT, ParseAmountError, normalize_amount, normalize_count, parse_amount};
pub use table_loader::{ProvisionsFile, TaxBracketRecord, TaxYearTableLoadError, TaxYearTableLoader};
pub use taxpayer_loader::TaxpayerLoadError;
