//! Model trainer: complete rows → chronological split → OLS → test metrics.

use super::linear::LinearRegression;
use super::metrics::RegressionMetrics;
use super::split::chronological_split;
use super::ModelError;
use crate::domain::{FeatureRow, FeatureTable, MODEL_INPUTS};
use chrono::NaiveDate;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Trainer settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Share of complete rows held out, taken from the end.
    pub test_fraction: f64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self { test_fraction: 0.2 }
    }
}

/// Held-out evaluation of a trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub mae: f64,
    pub rmse: f64,
    pub n_train: usize,
    pub n_test: usize,
    pub train_end: Option<NaiveDate>,
    pub test_start: Option<NaiveDate>,
    pub test_end: Option<NaiveDate>,
}

/// A fitted model and its held-out evaluation.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub model: LinearRegression,
    pub evaluation: Evaluation,
}

impl TrainReport {
    /// Fitted coefficients paired with their input column names.
    pub fn named_coefficients(&self) -> Vec<(&'static str, f64)> {
        self.model
            .coefficients()
            .map(|c| MODEL_INPUTS.iter().copied().zip(c.iter().copied()).collect())
            .unwrap_or_default()
    }
}

/// A row with every model input and the target present.
struct Sample {
    date: Option<NaiveDate>,
    inputs: [f64; 5],
    target: f64,
}

fn complete_samples(features: &FeatureTable) -> Vec<Sample> {
    features
        .rows()
        .iter()
        .filter_map(|row: &FeatureRow| {
            Some(Sample {
                date: row.date(),
                inputs: row.model_inputs()?,
                target: row.close()?,
            })
        })
        .collect()
}

fn design(samples: &[Sample]) -> Result<(Array2<f64>, Array1<f64>), ModelError> {
    let flat: Vec<f64> = samples.iter().flat_map(|s| s.inputs).collect();
    let x = Array2::from_shape_vec((samples.len(), MODEL_INPUTS.len()), flat)
        .map_err(|e| ModelError::Computation(e.to_string()))?;
    let y = samples.iter().map(|s| s.target).collect();
    Ok((x, y))
}

/// Train with the default 80/20 split.
pub fn train_model(features: &FeatureTable) -> Result<TrainReport, ModelError> {
    train_model_with(features, &TrainerConfig::default())
}

/// Drop incomplete rows, split chronologically, fit OLS on the train part
/// and score MAE/RMSE on the test part.
pub fn train_model_with(
    features: &FeatureTable,
    config: &TrainerConfig,
) -> Result<TrainReport, ModelError> {
    let samples = complete_samples(features);
    let (train, test) = chronological_split(&samples, config.test_fraction);

    if train.is_empty() || test.is_empty() {
        return Err(ModelError::InsufficientData {
            usable: samples.len(),
            train: train.len(),
            test: test.len(),
        });
    }

    let (x_train, y_train) = design(train)?;
    let (x_test, y_test) = design(test)?;

    let mut model = LinearRegression::new();
    model.fit(&x_train, &y_train)?;
    let preds = model.predict(&x_test)?;

    let metrics = RegressionMetrics::calculate(&y_test.to_vec(), &preds.to_vec());

    let evaluation = Evaluation {
        mae: metrics.mae,
        rmse: metrics.rmse,
        n_train: train.len(),
        n_test: test.len(),
        train_end: train.last().and_then(|s| s.date),
        test_start: test.first().and_then(|s| s.date),
        test_end: test.last().and_then(|s| s.date),
    };

    info!(
        n_train = evaluation.n_train,
        n_test = evaluation.n_test,
        "model trained: MAE {:.4}, RMSE {:.4}",
        evaluation.mae,
        evaluation.rmse
    );

    Ok(TrainReport { model, evaluation })
}
