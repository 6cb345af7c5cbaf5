//! Typed column schema for price and feature files.
//!
//! CSV files are read into a polars `DataFrame` with inferred dtypes. Before
//! any row is built, the frame is checked here: required columns must exist
//! (names matched case-insensitively) and every known column must carry a
//! dtype compatible with its declared kind. A mismatch fails the load instead
//! of letting garbage values flow downstream.

use crate::domain::FEATURE_COLUMNS;
use polars::prelude::*;
use std::collections::HashMap;

/// What a column is allowed to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Text to be parsed as a calendar date, or an already-typed date.
    Date,
    /// Any integer or floating point column.
    Numeric,
}

/// One declared column.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub required: bool,
}

const fn spec(name: &'static str, kind: ColumnKind, required: bool) -> ColumnSpec {
    ColumnSpec {
        name,
        kind,
        required,
    }
}

const PRICE_COLUMNS: [ColumnSpec; 6] = [
    spec("date", ColumnKind::Date, true),
    spec("open", ColumnKind::Numeric, false),
    spec("high", ColumnKind::Numeric, false),
    spec("low", ColumnKind::Numeric, false),
    spec("close", ColumnKind::Numeric, true),
    spec("volume", ColumnKind::Numeric, false),
];

/// Schema of a price file: `date` and `close` required, OHLV optional.
pub struct PriceSchema;

impl PriceSchema {
    pub fn columns() -> Vec<ColumnSpec> {
        PRICE_COLUMNS.to_vec()
    }

    pub fn validate(df: &DataFrame) -> Result<ResolvedColumns, SchemaError> {
        resolve(df, &Self::columns())
    }
}

/// Schema of a feature file: the price schema plus every derived column.
pub struct FeatureSchema;

impl FeatureSchema {
    pub fn columns() -> Vec<ColumnSpec> {
        let mut cols = PriceSchema::columns();
        cols.extend(
            FEATURE_COLUMNS
                .iter()
                .map(|name| spec(name, ColumnKind::Numeric, true)),
        );
        cols
    }

    pub fn validate(df: &DataFrame) -> Result<ResolvedColumns, SchemaError> {
        resolve(df, &Self::columns())
    }
}

/// Mapping from declared column name to the header actually present in the file.
#[derive(Debug, Clone, Default)]
pub struct ResolvedColumns {
    actual: HashMap<&'static str, String>,
}

impl ResolvedColumns {
    /// Header in the file for a declared column, if the file has it.
    pub fn get(&self, declared: &str) -> Option<&str> {
        self.actual.get(declared).map(String::as_str)
    }
}

fn resolve(df: &DataFrame, specs: &[ColumnSpec]) -> Result<ResolvedColumns, SchemaError> {
    let mut resolved = ResolvedColumns::default();

    for spec in specs {
        let found = df
            .get_columns()
            .iter()
            .find(|c| c.name().as_str().eq_ignore_ascii_case(spec.name));

        let Some(column) = found else {
            if spec.required {
                return Err(SchemaError::MissingColumn(spec.name.to_string()));
            }
            continue;
        };

        if !kind_accepts(spec.kind, column) {
            return Err(SchemaError::TypeMismatch {
                column: column.name().to_string(),
                expected: spec.kind,
                actual: column.dtype().clone(),
            });
        }

        resolved
            .actual
            .insert(spec.name, column.name().to_string());
    }

    Ok(resolved)
}

fn kind_accepts(kind: ColumnKind, column: &Column) -> bool {
    // Fully empty columns are inferred as text; they carry no values to mistype.
    if column.null_count() == column.len() {
        return true;
    }
    match kind {
        ColumnKind::Date => matches!(
            column.dtype(),
            DataType::String | DataType::Date | DataType::Datetime(_, _)
        ),
        ColumnKind::Numeric => matches!(
            column.dtype(),
            DataType::Float64
                | DataType::Float32
                | DataType::Int64
                | DataType::Int32
                | DataType::Int16
                | DataType::Int8
                | DataType::UInt64
                | DataType::UInt32
                | DataType::UInt16
                | DataType::UInt8
        ),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("type mismatch in column {column}: expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        column: String,
        expected: ColumnKind,
        actual: DataType,
    },
}
