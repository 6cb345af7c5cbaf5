//! Price table: the typed form of a daily price history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observation of a daily price history.
///
/// `None` is the explicit missing marker. A row whose date could not be
/// parsed keeps `date: None` rather than failing the whole load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: Option<NaiveDate>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl PriceRow {
    /// Row carrying only a date and a close, the two columns the pipeline needs.
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date: Some(date),
            open: None,
            high: None,
            low: None,
            close: Some(close),
            volume: None,
        }
    }

    /// Hashable identity of every field, floats compared by bit pattern.
    ///
    /// Two rows are exact duplicates when their keys are equal; `0.0` and
    /// `-0.0` are distinct.
    pub fn exact_key(&self) -> ExactKey {
        let bits = |v: Option<f64>| v.map(f64::to_bits);
        (
            self.date,
            [
                bits(self.open),
                bits(self.high),
                bits(self.low),
                bits(self.close),
                bits(self.volume),
            ],
        )
    }
}

/// See [`PriceRow::exact_key`].
pub type ExactKey = (Option<NaiveDate>, [Option<u64>; 5]);

/// Ordered sequence of price rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    rows: Vec<PriceRow>,
}

impl PriceTable {
    pub fn new(rows: Vec<PriceRow>) -> Self {
        Self { rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<PriceRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The close series in row order.
    pub fn closes(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.close).collect()
    }
}

impl FromIterator<PriceRow> for PriceTable {
    fn from_iter<I: IntoIterator<Item = PriceRow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
