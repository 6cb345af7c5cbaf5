//! Feature table: a price table extended with derived indicator columns.

use super::price::{PriceRow, PriceTable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Derived column names, in the order they are written out.
pub const FEATURE_COLUMNS: [&str; 6] = ["MA_7", "MA_21", "Volatility", "Returns", "Lag_1", "Lag_2"];

/// Columns the regression model consumes, in coefficient order.
pub const MODEL_INPUTS: [&str; 5] = ["MA_7", "MA_21", "Volatility", "Lag_1", "Lag_2"];

/// A price row plus its derived features. Missing warmup values are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub price: PriceRow,
    pub ma_7: Option<f64>,
    pub ma_21: Option<f64>,
    pub volatility: Option<f64>,
    pub returns: Option<f64>,
    pub lag_1: Option<f64>,
    pub lag_2: Option<f64>,
}

impl FeatureRow {
    /// A row with no features computed yet.
    pub fn bare(price: PriceRow) -> Self {
        Self {
            price,
            ma_7: None,
            ma_21: None,
            volatility: None,
            returns: None,
            lag_1: None,
            lag_2: None,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.price.date
    }

    pub fn close(&self) -> Option<f64> {
        self.price.close
    }

    /// Value of a derived column by its written name.
    pub fn feature(&self, name: &str) -> Option<f64> {
        match name {
            "MA_7" => self.ma_7,
            "MA_21" => self.ma_21,
            "Volatility" => self.volatility,
            "Returns" => self.returns,
            "Lag_1" => self.lag_1,
            "Lag_2" => self.lag_2,
            _ => None,
        }
    }

    /// Model inputs in `MODEL_INPUTS` order, or `None` if any is missing.
    pub fn model_inputs(&self) -> Option<[f64; 5]> {
        Some([
            self.ma_7?,
            self.ma_21?,
            self.volatility?,
            self.lag_1?,
            self.lag_2?,
        ])
    }
}

/// Ordered feature rows, aligned one-to-one with the source price table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub fn new(rows: Vec<FeatureRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total written columns: six price columns plus the derived ones.
    pub fn column_count(&self) -> usize {
        6 + FEATURE_COLUMNS.len()
    }

    /// Series of a derived column by name.
    pub fn column(&self, name: &str) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.feature(name)).collect()
    }

    /// Drop the derived columns and return the underlying price table.
    pub fn to_price_table(&self) -> PriceTable {
        self.rows.iter().map(|r| r.price.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_row() -> FeatureRow {
        FeatureRow {
            price: PriceRow::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 10.0),
            ma_7: Some(1.0),
            ma_21: Some(2.0),
            volatility: Some(3.0),
            returns: Some(4.0),
            lag_1: Some(5.0),
            lag_2: Some(6.0),
        }
    }

    #[test]
    fn model_inputs_skip_returns() {
        assert_eq!(full_row().model_inputs(), Some([1.0, 2.0, 3.0, 5.0, 6.0]));
    }

    #[test]
    fn model_inputs_none_when_any_missing() {
        let mut row = full_row();
        row.lag_2 = None;
        assert_eq!(row.model_inputs(), None);
    }

    #[test]
    fn feature_lookup_by_name() {
        let row = full_row();
        for (i, name) in FEATURE_COLUMNS.iter().enumerate() {
            assert_eq!(row.feature(name), Some(i as f64 + 1.0));
        }
        assert_eq!(row.feature("RSI"), None);
    }
}
