//! Feature generator: derives the indicator columns from the close series.

use crate::domain::{FeatureRow, FeatureTable, PriceTable};
use crate::indicators::{Indicator, Lag, Returns, Sma, Volatility};
use tracing::info;

/// Short moving-average window.
pub const MA_SHORT: usize = 7;
/// Long moving-average window.
pub const MA_LONG: usize = 21;
/// Window of returns the volatility is measured over.
pub const VOLATILITY_WINDOW: usize = 7;

/// Extend a cleaned price table with MA_7, MA_21, Volatility, Returns, Lag_1
/// and Lag_2. Row order is preserved and no row is dropped; warmup values
/// stay missing.
pub fn add_technical_indicators(table: PriceTable) -> FeatureTable {
    let closes = table.closes();

    let ma_7 = Sma::new(MA_SHORT).compute(&closes);
    let ma_21 = Sma::new(MA_LONG).compute(&closes);
    let volatility = Volatility::new(VOLATILITY_WINDOW).compute(&closes);
    let returns = Returns::new().compute(&closes);
    let lag_1 = Lag::new(1).compute(&closes);
    let lag_2 = Lag::new(2).compute(&closes);

    let rows = table
        .into_rows()
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

    let features = FeatureTable::new(rows);
    info!(
        rows = features.len(),
        columns = features.column_count(),
        "added technical indicators"
    );
    features
}
