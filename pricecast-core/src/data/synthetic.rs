//! Synthetic price provider for offline runs.
//!
//! Generates a seeded geometric random walk over weekdays. The RNG seed is
//! derived from the base seed and the symbol, so the same symbol always
//! yields the same history and different symbols diverge.

use super::provider::{DataError, DataSource, Period, PriceProvider};
use crate::domain::{PriceRow, PriceTable};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random-walk price generator implementing `PriceProvider`.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    seed: u64,
    end: NaiveDate,
    start_price: f64,
}

impl SyntheticProvider {
    /// Generator whose histories end on `end`.
    pub fn new(seed: u64, end: NaiveDate) -> Self {
        Self {
            seed,
            end,
            start_price: 100.0,
        }
    }

    /// Generator whose histories end today.
    pub fn ending_today(seed: u64) -> Self {
        Self::new(seed, chrono::Local::now().date_naive())
    }

    fn rng_for(&self, symbol: &str) -> StdRng {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(symbol.as_bytes());
        StdRng::from_seed(*hasher.finalize().as_bytes())
    }

    /// Generate rows for every weekday in `(start, end]`.
    pub fn generate(&self, symbol: &str, start: NaiveDate) -> Vec<PriceRow> {
        let mut rng = self.rng_for(symbol);
        let mut rows = Vec::new();
        let mut price = self.start_price;
        let mut current = start + chrono::Duration::days(1);

        while current <= self.end {
            if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                current += chrono::Duration::days(1);
                continue;
            }

            let daily_return: f64 = rng.gen_range(-0.03..0.03);
            let open = price;
            let close = price * (1.0 + daily_return);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            let volume = rng.gen_range(500_000..5_000_000u64) as f64;

            rows.push(PriceRow {
                date: Some(current),
                open: Some(open),
                high: Some(high),
                low: Some(low),
                close: Some(close),
                volume: Some(volume),
            });

            price = close;
            current += chrono::Duration::days(1);
        }

        rows
    }
}

impl PriceProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn source(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn fetch(&self, symbol: &str, period: Period) -> Result<PriceTable, DataError> {
        let start = period.start_from(self.end);
        Ok(PriceTable::new(self.generate(symbol, start)))
    }
}
