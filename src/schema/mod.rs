//! Record shapes for customers and leads, independent of the storage engine.

mod customer;
mod lead;
pub use customer::*;
pub use lead::*;
