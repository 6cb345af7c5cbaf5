//! CSV ingestion into typed tables.
//!
//! Files are read with polars, validated against [`PriceSchema`] or
//! [`FeatureSchema`], then converted column by column into rows. Date text is
//! parsed here; values that do not parse become `None` rather than failing the
//! load.

use crate::data::provider::DataError;
use crate::data::schema::{FeatureSchema, PriceSchema, ResolvedColumns};
use crate::domain::{FeatureRow, FeatureTable, PriceRow, PriceTable};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::path::Path;
use tracing::{error, info, warn};

/// Rows scanned for dtype inference.
const INFER_SCHEMA_ROWS: usize = 10_000;

/// Read a CSV file into a `DataFrame` with inferred column types.
pub fn read_frame(path: &Path) -> Result<DataFrame, DataError> {
    if !path.exists() {
        return Err(DataError::FileNotFound(path.to_path_buf()));
    }
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// Strict price loader: any read, parse or schema failure is returned.
pub fn load_csv(path: &Path) -> Result<PriceTable, DataError> {
    let df = read_frame(path)?;
    price_table_from_frame(&df)
}

/// Strict feature loader for files written by the feature stage.
pub fn load_features_csv(path: &Path) -> Result<FeatureTable, DataError> {
    let df = read_frame(path)?;
    feature_table_from_frame(&df)
}

/// Local-file loader that never fails.
///
/// Errors are logged and degrade to an empty table, so a missing raw file
/// surfaces as "0 rows" instead of aborting the caller.
pub fn load_from_csv(path: &Path) -> PriceTable {
    match load_csv(path) {
        Ok(table) => {
            info!(path = %path.display(), rows = table.len(), "loaded price data");
            table
        }
        Err(e) => {
            error!(path = %path.display(), "error loading data: {e}");
            PriceTable::empty()
        }
    }
}

/// Convert a validated frame into a price table.
pub fn price_table_from_frame(df: &DataFrame) -> Result<PriceTable, DataError> {
    let cols = PriceSchema::validate(df)?;
    Ok(PriceTable::new(price_rows(df, &cols)?))
}

/// Convert a validated frame into a feature table.
pub fn feature_table_from_frame(df: &DataFrame) -> Result<FeatureTable, DataError> {
    let cols = FeatureSchema::validate(df)?;
    let prices = price_rows(df, &cols)?;

    let ma_7 = numeric_column(df, &cols, "MA_7")?;
    let ma_21 = numeric_column(df, &cols, "MA_21")?;
    let volatility = numeric_column(df, &cols, "Volatility")?;
    let returns = numeric_column(df, &cols, "Returns")?;
    let lag_1 = numeric_column(df, &cols, "Lag_1")?;
    let lag_2 = numeric_column(df, &cols, "Lag_2")?;

    let rows = prices
        .into_iter()
        .enumerate()
        .map(|(i, price)| FeatureRow {
            price,
            ma_7: ma_7[i],
            ma_21: ma_21[i],
            volatility: volatility[i],
            returns: returns[i],
            lag_1: lag_1[i],
            lag_2: lag_2[i],
        })
        .collect();

    Ok(FeatureTable::new(rows))
}

fn price_rows(df: &DataFrame, cols: &ResolvedColumns) -> Result<Vec<PriceRow>, DataError> {
    let dates = date_column(df, cols)?;
    let open = numeric_column(df, cols, "open")?;
    let high = numeric_column(df, cols, "high")?;
    let low = numeric_column(df, cols, "low")?;
    let close = numeric_column(df, cols, "close")?;
    let volume = numeric_column(df, cols, "volume")?;

    Ok((0..df.height())
        .map(|i| PriceRow {
            date: dates[i],
            open: open[i],
            high: high[i],
            low: low[i],
            close: close[i],
            volume: volume[i],
        })
        .collect())
}

/// Values of a numeric column, or all-`None` if the optional column is absent.
fn numeric_column(
    df: &DataFrame,
    cols: &ResolvedColumns,
    declared: &str,
) -> Result<Vec<Option<f64>>, DataError> {
    let Some(name) = cols.get(declared) else {
        return Ok(vec![None; df.height()]);
    };
    let cast = df.column(name)?.cast(&DataType::Float64)?;
    let values: Vec<Option<f64>> = cast
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(values)
}

fn date_column(
    df: &DataFrame,
    cols: &ResolvedColumns,
) -> Result<Vec<Option<NaiveDate>>, DataError> {
    let Some(name) = cols.get("date") else {
        return Ok(vec![None; df.height()]);
    };
    let cast = df.column(name)?.cast(&DataType::String)?;
    let mut unparsed = 0usize;
    let dates: Vec<Option<NaiveDate>> = cast
        .str()?
        .into_iter()
        .map(|raw| {
            let parsed = raw.and_then(parse_date);
            if raw.is_some() && parsed.is_none() {
                unparsed += 1;
            }
            parsed
        })
        .collect();
    if unparsed > 0 {
        warn!(column = name, unparsed, "dates could not be parsed and were marked missing");
    }
    Ok(dates)
}

/// Parse a date cell. Accepts plain dates, datetimes with or without an
/// offset (the local calendar day is kept) and US `m/d/Y`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local().date());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%.f%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_local().date());
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%m/%d/%Y").ok()
}
