//! Property tests for pipeline invariants.
//!
//! Uses proptest to verify:
//! 1. Cleaning is idempotent, never grows the table and never keeps a missing close
//! 2. MA_7 is the trailing seven-day mean and missing before index 6
//! 3. Lag columns shift the close series exactly
//! 4. The train/test split keeps chronological order

use chrono::{Duration, NaiveDate};
use pricecast_core::clean::clean;
use pricecast_core::domain::{PriceRow, PriceTable};
use pricecast_core::features::add_technical_indicators;
use pricecast_core::model::chronological_split;
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Dates drawn from a narrow range so duplicates are common.
fn arb_date() -> impl Strategy<Value = Option<NaiveDate>> {
    prop::option::weighted(0.9, (0..30i64).prop_map(|d| base_date() + Duration::days(d)))
}

fn arb_close() -> impl Strategy<Value = Option<f64>> {
    prop::option::weighted(0.85, (10.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0))
}

fn arb_row() -> impl Strategy<Value = PriceRow> {
    (arb_date(), arb_close()).prop_map(|(date, close)| PriceRow {
        date,
        open: close,
        high: close,
        low: close,
        close,
        volume: Some(1_000.0),
    })
}

fn arb_table() -> impl Strategy<Value = PriceTable> {
    prop::collection::vec(arb_row(), 0..60).prop_map(PriceTable::new)
}

fn series_table(closes: &[f64]) -> PriceTable {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PriceRow::new(base_date() + Duration::days(i as i64), c))
        .collect()
}

// ── 1. Cleaning ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn clean_is_idempotent(table in arb_table()) {
        let once = clean(table);
        let twice = clean(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn clean_never_grows(table in arb_table()) {
        let before = table.len();
        prop_assert!(clean(table).len() <= before);
    }

    #[test]
    fn clean_leaves_no_missing_close(table in arb_table()) {
        prop_assert!(clean(table).rows().iter().all(|r| r.close.is_some()));
    }

    #[test]
    fn clean_output_is_strictly_ordered_by_date(table in arb_table()) {
        let cleaned = clean(table);
        let dated: Vec<NaiveDate> = cleaned.rows().iter().filter_map(|r| r.date).collect();
        prop_assert!(dated.windows(2).all(|w| w[0] < w[1]));
        // Undated rows trail the dated ones.
        let first_undated = cleaned.rows().iter().position(|r| r.date.is_none());
        if let Some(pos) = first_undated {
            prop_assert!(cleaned.rows()[pos..].iter().all(|r| r.date.is_none()));
        }
    }
}

// ── 2. Moving average ────────────────────────────────────────────────

proptest! {
    #[test]
    fn ma_7_is_trailing_mean(closes in prop::collection::vec(1.0..1000.0_f64, 0..80)) {
        let features = add_technical_indicators(series_table(&closes));
        let ma = features.column("MA_7");
        prop_assert_eq!(ma.len(), closes.len());
        for (i, value) in ma.iter().enumerate() {
            if i < 6 {
                prop_assert!(value.is_none());
            } else {
                let mean = closes[i - 6..=i].iter().sum::<f64>() / 7.0;
                let got = value.unwrap();
                prop_assert!(
                    (got - mean).abs() < 1e-9 * mean.max(1.0),
                    "i={} got={} want={}",
                    i,
                    got,
                    mean
                );
            }
        }
    }

    #[test]
    fn volatility_is_never_negative(closes in prop::collection::vec(1.0..1000.0_f64, 0..80)) {
        let features = add_technical_indicators(series_table(&closes));
        for v in features.column("Volatility").into_iter().flatten() {
            prop_assert!(v >= 0.0);
        }
    }
}

// ── 3. Lags ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn lags_shift_close(closes in prop::collection::vec(1.0..1000.0_f64, 0..50)) {
        let features = add_technical_indicators(series_table(&closes));
        let lag_1 = features.column("Lag_1");
        let lag_2 = features.column("Lag_2");
        for i in 0..closes.len() {
            prop_assert_eq!(lag_1[i], if i >= 1 { Some(closes[i - 1]) } else { None });
            prop_assert_eq!(lag_2[i], if i >= 2 { Some(closes[i - 2]) } else { None });
        }
    }
}

// ── 4. Chronological split ───────────────────────────────────────────

proptest! {
    #[test]
    fn split_preserves_order(
        offsets in prop::collection::vec(0..2000i64, 0..100),
        fraction in 0.05..0.95_f64,
    ) {
        let mut dates: Vec<NaiveDate> = offsets
            .iter()
            .map(|&d| base_date() + Duration::days(d))
            .collect();
        dates.sort();

        let (train, test) = chronological_split(&dates, fraction);
        prop_assert_eq!(train.len() + test.len(), dates.len());
        prop_assert_eq!(test.len(), (fraction * dates.len() as f64).ceil() as usize);
        if let (Some(last_train), Some(first_test)) = (train.last(), test.first()) {
            prop_assert!(last_train <= first_test);
        }
        prop_assert_eq!([train, test].concat(), dates);
    }
}
