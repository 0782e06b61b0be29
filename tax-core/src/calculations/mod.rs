//! Income-tax calculation pipeline.
//!
//! [`TaxEngine`] drives the steps; the submodules hold the bracket tax,
//! deduction and credit rules it combines. [`withholding`] reuses the same
//! bracket tax for a per-paycheck estimate.

pub mod bracket_tax;
pub mod common;
pub mod credits;
pub mod deductions;
pub mod engine;
pub mod withholding;

pub use engine::{TaxEngine, compute};
pub use withholding::estimate_withholding;
