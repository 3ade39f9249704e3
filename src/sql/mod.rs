//! Safe SQL builder: identifiers from the typed allow-list only, values as parameters.

mod builder;
pub use builder::*;
