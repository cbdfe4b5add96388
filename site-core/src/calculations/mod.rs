//! Price calculations for the budget form.
//!
//! Arithmetic stays in full [`rust_decimal::Decimal`] precision; the helpers
//! in [`common`] round to cents only when a value is formatted for display.

pub mod common;
pub mod pricing;

pub use pricing::{DAYS_PER_YEAR, MAX_DISCOUNT_PERCENT, PriceCalculator, discount_percent};
