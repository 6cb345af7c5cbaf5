//! Data loading: local CSV files, remote providers and CSV export.

pub mod export;
pub mod ingest;
pub mod provider;
pub mod schema;
pub mod synthetic;
pub mod yahoo;

pub use export::{write_features_csv, write_prices_csv};
pub use ingest::{load_csv, load_features_csv, load_from_csv};
pub use provider::{DataError, DataSource, Period, PriceProvider};
pub use schema::{FeatureSchema, PriceSchema, SchemaError};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;

use crate::domain::PriceTable;
use tracing::info;

/// Remote mode of the loader: fetch `symbol` over `period` from `provider`.
///
/// Provider failures propagate unchanged.
pub fn load_from_provider(
    provider: &dyn PriceProvider,
    symbol: &str,
    period: Period,
) -> Result<PriceTable, DataError> {
    let table = provider.fetch(symbol, period)?;
    info!(
        provider = provider.name(),
        source = %provider.source(),
        symbol,
        %period,
        rows = table.len(),
        "downloaded price data"
    );
    Ok(table)
}
