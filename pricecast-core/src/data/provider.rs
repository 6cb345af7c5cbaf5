//! Price provider trait, period strings and structured error types.
//!
//! The `PriceProvider` trait abstracts over remote sources (Yahoo Finance,
//! the synthetic generator) so the download stage can be exercised without
//! network access.

use crate::data::schema::SchemaError;
use crate::domain::PriceTable;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("table read error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("schema mismatch: {0}")]
    Schema(#[from] SchemaError),

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider")]
    RateLimited,

    #[error("HTTP {status} from provider for {symbol}")]
    HttpStatus { status: u16, symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error(
        "invalid period '{0}' (expected one of 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max)"
    )]
    InvalidPeriod(String),
}

/// Where a price table came from. Synthetic histories are never real quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    Synthetic,
}

impl DataSource {
    pub fn is_synthetic(&self) -> bool {
        matches!(self, DataSource::Synthetic)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DataSource::YahooFinance => "yahoo_finance",
            DataSource::Synthetic => "synthetic",
        })
    }
}

/// History window understood by the chart API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    OneDay,
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    TenYears,
    YearToDate,
    Max,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::FiveDays => "5d",
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::TenYears => "10y",
            Period::YearToDate => "ytd",
            Period::Max => "max",
        }
    }

    /// First calendar day covered by this period when it ends on `end`.
    ///
    /// `max` is capped at thirty years for generators that need a finite range.
    pub fn start_from(&self, end: NaiveDate) -> NaiveDate {
        let back = |months: u32| {
            end.checked_sub_months(Months::new(months))
                .unwrap_or(NaiveDate::MIN)
        };
        match self {
            Period::OneDay => end - chrono::Duration::days(1),
            Period::FiveDays => end - chrono::Duration::days(5),
            Period::OneMonth => back(1),
            Period::ThreeMonths => back(3),
            Period::SixMonths => back(6),
            Period::OneYear => back(12),
            Period::TwoYears => back(24),
            Period::FiveYears => back(60),
            Period::TenYears => back(120),
            Period::YearToDate => NaiveDate::from_ymd_opt(end.year(), 1, 1).unwrap_or(end),
            Period::Max => back(360),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl FromStr for Period {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1d" => Ok(Period::OneDay),
            "5d" => Ok(Period::FiveDays),
            "1mo" => Ok(Period::OneMonth),
            "3mo" => Ok(Period::ThreeMonths),
            "6mo" => Ok(Period::SixMonths),
            "1y" => Ok(Period::OneYear),
            "2y" => Ok(Period::TwoYears),
            "5y" => Ok(Period::FiveYears),
            "10y" => Ok(Period::TenYears),
            "ytd" => Ok(Period::YearToDate),
            "max" => Ok(Period::Max),
            _ => Err(DataError::InvalidPeriod(s.to_string())),
        }
    }
}

/// Trait for remote price providers.
///
/// Implementations return the daily history for `symbol` over `period`, with
/// the provider's time index already normalised into the `date` column.
/// Failures are returned as-is; there is no retry layer.
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Where tables from this provider are tagged as coming from.
    fn source(&self) -> DataSource;

    /// Fetch the daily history for a symbol.
    fn fetch(&self, symbol: &str, period: Period) -> Result<PriceTable, DataError>;
}
