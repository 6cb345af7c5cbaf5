//! CSV export of price and feature tables.
//!
//! Columns: Date, Open, High, Low, Close, Volume, then the derived columns for
//! feature tables. Missing values are written as empty cells. Floats use the
//! shortest representation that reads back to the same value.

use crate::data::provider::DataError;
use crate::domain::{FeatureTable, PriceRow, PriceTable, FEATURE_COLUMNS};
use std::fs;
use std::path::Path;

const PRICE_HEADER: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

/// Write a price table, creating parent directories as needed.
pub fn write_prices_csv(path: &Path, table: &PriceTable) -> Result<(), DataError> {
    let mut wtr = open_writer(path)?;
    wtr.write_record(PRICE_HEADER)?;
    for row in table.rows() {
        wtr.write_record(price_cells(row))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a feature table, creating parent directories as needed.
pub fn write_features_csv(path: &Path, table: &FeatureTable) -> Result<(), DataError> {
    let mut wtr = open_writer(path)?;
    wtr.write_record(PRICE_HEADER.iter().chain(FEATURE_COLUMNS.iter()))?;
    for row in table.rows() {
        let mut cells = price_cells(&row.price).to_vec();
        cells.extend(
            [
                row.ma_7,
                row.ma_21,
                row.volatility,
                row.returns,
                row.lag_1,
                row.lag_2,
            ]
            .map(cell),
        );
        wtr.write_record(&cells)?;
    }
    wtr.flush()?;
    Ok(())
}

fn open_writer(path: &Path) -> Result<csv::Writer<fs::File>, DataError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(csv::Writer::from_path(path)?)
}

fn price_cells(row: &PriceRow) -> [String; 6] {
    [
        row.date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        cell(row.open),
        cell(row.high),
        cell(row.low),
        cell(row.close),
        cell(row.volume),
    ]
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
