//! Storage-agnostic request logic: field reconciliation, validation, date ranges.

mod date_range;
mod reconcile;
pub mod validation;
pub use date_range::{DateRange, DATE_RANGE_EXAMPLE};
pub use reconcile::{reconcile, AllowedField, FieldChanges};
