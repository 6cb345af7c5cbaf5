//! Pipeline stages: download → clean → features → train.
//!
//! Each stage reads the previous stage's CSV file and writes its own, so any
//! stage can be re-run on its own. `run_all` chains them in order.

use crate::clean::clean;
use crate::config::{ConfigError, PipelineConfig};
use crate::data::{
    load_csv, load_features_csv, load_from_provider, write_features_csv, write_prices_csv,
    DataError, DataSource, Period, PriceProvider,
};
use crate::features::add_technical_indicators;
use crate::model::{train_model_with, ModelError, TrainReport, TrainerConfig};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Row counts produced by one run of the full pipeline.
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    /// Origin of the downloaded prices.
    pub source: DataSource,
    pub raw_rows: usize,
    pub cleaned_rows: usize,
    pub feature_rows: usize,
    pub report: TrainReport,
}

/// Fetch prices from `provider` and write them to `raw_path`.
pub fn download_stage(
    provider: &dyn PriceProvider,
    symbol: &str,
    period: Period,
    raw_path: &Path,
) -> Result<usize, PipelineError> {
    let table = load_from_provider(provider, symbol, period)?;
    write_prices_csv(raw_path, &table)?;
    info!(path = %raw_path.display(), rows = table.len(), "raw data saved");
    Ok(table.len())
}

/// Clean the raw file and write the result to `cleaned_path`.
pub fn clean_stage(raw_path: &Path, cleaned_path: &Path) -> Result<usize, PipelineError> {
    let cleaned = clean(load_csv(raw_path)?);
    write_prices_csv(cleaned_path, &cleaned)?;
    info!(path = %cleaned_path.display(), rows = cleaned.len(), "cleaned data saved");
    Ok(cleaned.len())
}

/// Derive indicator columns from the cleaned file and write them out.
pub fn features_stage(cleaned_path: &Path, features_path: &Path) -> Result<usize, PipelineError> {
    let features = add_technical_indicators(load_csv(cleaned_path)?);
    write_features_csv(features_path, &features)?;
    info!(path = %features_path.display(), rows = features.len(), "features saved");
    Ok(features.len())
}

/// Fit and evaluate the model on the feature file.
pub fn train_stage(
    features_path: &Path,
    config: &TrainerConfig,
) -> Result<TrainReport, PipelineError> {
    let features = load_features_csv(features_path)?;
    Ok(train_model_with(&features, config)?)
}

/// Run every stage in order using the paths in `config`.
pub fn run_all(
    provider: &dyn PriceProvider,
    config: &PipelineConfig,
) -> Result<PipelineSummary, PipelineError> {
    let data = &config.data;
    let raw_rows = download_stage(provider, &data.symbol, data.period, &data.raw_path)?;
    let cleaned_rows = clean_stage(&data.raw_path, &data.cleaned_path)?;
    let feature_rows = features_stage(&data.cleaned_path, &data.features_path)?;
    let report = train_stage(&data.features_path, &config.model)?;
    Ok(PipelineSummary {
        source: provider.source(),
        raw_rows,
        cleaned_rows,
        feature_rows,
        report,
    })
}
