//! Cleaner: dedupe, drop missing closes, sort chronologically.
//!
//! Output invariants:
//! - no two rows are exact duplicates
//! - every row has a close
//! - rows are sorted ascending by date, rows without a date last
//! - no two dated rows share a date (first occurrence in sorted order wins)
//!
//! The sort is stable, so ties keep their input order and the pass is
//! idempotent.

use crate::domain::{PriceRow, PriceTable};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::info;

/// Clean a raw price table.
pub fn clean(table: PriceTable) -> PriceTable {
    let raw_len = table.len();

    let mut identities = HashSet::with_capacity(raw_len);
    let mut kept: Vec<PriceRow> = table
        .into_rows()
        .into_iter()
        .filter(|r| identities.insert(r.exact_key()))
        .collect();

    kept.retain(|r| r.close.is_some());
    kept.sort_by(chronological);

    let mut seen = HashSet::new();
    kept.retain(|r| match r.date {
        Some(d) => seen.insert(d),
        None => true,
    });

    info!(raw = raw_len, rows = kept.len(), "cleaned price data");
    PriceTable::new(kept)
}

/// Dates ascending, missing dates after every real one.
fn chronological(a: &PriceRow, b: &PriceRow) -> Ordering {
    match (a.date, b.date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn row(d: u32, close: f64) -> PriceRow {
        PriceRow::new(day(d), close)
    }

    #[test]
    fn removes_exact_duplicates() {
        let table = PriceTable::new(vec![row(2, 1.0), row(2, 1.0), row(3, 2.0)]);
        let cleaned = clean(table);
        assert_eq!(cleaned.len(), 2);
    }

    #[test]
    fn drops_missing_close() {
        let mut missing = row(4, 0.0);
        missing.close = None;
        let cleaned = clean(PriceTable::new(vec![row(2, 1.0), missing]));
        assert_eq!(cleaned.len(), 1);
        assert!(cleaned.rows().iter().all(|r| r.close.is_some()));
    }

    #[test]
    fn sorts_by_date() {
        let cleaned = clean(PriceTable::new(vec![row(5, 3.0), row(2, 1.0), row(3, 2.0)]));
        let dates: Vec<_> = cleaned.rows().iter().map(|r| r.date.unwrap()).collect();
        assert_eq!(dates, vec![day(2), day(3), day(5)]);
    }

    #[test]
    fn same_date_different_values_keeps_first() {
        let cleaned = clean(PriceTable::new(vec![row(3, 9.0), row(2, 1.0), row(3, 2.0)]));
        assert_eq!(cleaned.closes(), vec![Some(1.0), Some(9.0)]);
    }

    #[test]
    fn undated_rows_go_last_in_input_order() {
        let mut a = row(1, 5.0);
        a.date = None;
        let mut b = row(1, 6.0);
        b.date = None;
        let cleaned = clean(PriceTable::new(vec![a, row(3, 1.0), b, row(2, 2.0)]));
        assert_eq!(
            cleaned.closes(),
            vec![Some(2.0), Some(1.0), Some(5.0), Some(6.0)]
        );
    }

    #[test]
    fn empty_table_stays_empty() {
        assert!(clean(PriceTable::empty()).is_empty());
    }

    #[test]
    fn idempotent_on_messy_input() {
        let mut undated = row(1, 4.0);
        undated.date = None;
        let mut no_close = row(9, 0.0);
        no_close.close = None;
        let table = PriceTable::new(vec![
            row(4, 1.0),
            undated,
            row(2, 3.0),
            row(4, 1.0),
            no_close,
            row(4, 2.0),
        ]);
        let once = clean(table);
        let twice = clean(once.clone());
        assert_eq!(once, twice);
    }
}
