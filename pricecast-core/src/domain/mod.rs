//! Domain types: price rows and feature rows, with their tables.

pub mod feature;
pub mod price;

pub use feature::{FeatureRow, FeatureTable, FEATURE_COLUMNS, MODEL_INPUTS};
pub use price::{ExactKey, PriceRow, PriceTable};
